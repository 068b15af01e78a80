//! Route-level authorization gate.
//!
//! `PermissionGate::any([...])` is declared at composition time on gated
//! routes. It resolves the caller's identity through the same resolver the
//! `CurrentUser` extractor uses, applies the overlap check, and caches the
//! resolved identity in request extensions so the handler does not resolve
//! twice. Authentication failures surface as 401 before authorization is
//! even attempted; only an authenticated caller can get a 403 here.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::HttpMessage;
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::authorize::authorize;
use crate::auth::permissions::Permission;
use crate::extractors::current_user::CurrentUser;

pub struct PermissionGate {
    required: Rc<Vec<Permission>>,
}

impl PermissionGate {
    /// Gate on holding ANY of the given permissions.
    pub fn any(required: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            required: Rc::new(required.into_iter().collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for PermissionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = PermissionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PermissionGateMiddleware {
            service: Rc::new(service),
            required: Rc::clone(&self.required),
        }))
    }
}

pub struct PermissionGateMiddleware<S> {
    service: Rc<S>,
    required: Rc<Vec<Permission>>,
}

impl<S, B> Service<ServiceRequest> for PermissionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = Rc::clone(&self.required);

        Box::pin(async move {
            let current = CurrentUser::resolve(req.request()).await?;
            authorize(&current.permissions, &required)?;
            req.extensions_mut().insert(current);

            service.call(req).await
        })
    }
}

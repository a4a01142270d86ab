use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::domain::user::Identity;
use crate::errors::AppError;
use crate::state::AppState;

/// Header set by the upstream session layer once a user has logged in.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The caller, resolved by loading the user named in [`USER_ID_HEADER`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

fn parse_user_id(req: &HttpRequest) -> Result<i32, AppError> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;
    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("invalid {USER_ID_HEADER} header")))
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = parse_user_id(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let user_id = user_id.inspect_err(|e| log::warn!("Rejected request: {}", e))?;
            let state =
                state.ok_or_else(|| AppError::Internal("application state not configured".into()))?;

            let identity = web::block(move || state.users.resolve_identity(user_id))
                .await
                .map_err(|e| AppError::Internal(e.to_string()))??;

            identity
                .map(CurrentUser)
                .ok_or_else(|| AppError::Unauthorized(format!("unknown user {user_id}")))
        })
    }
}

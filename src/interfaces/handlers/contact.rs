use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::contact::NewContactForm, errors::AppError, AppState};

#[instrument(skip(state, form))]
pub async fn create_contact(
    state: web::Data<AppState>,
    form: web::Json<NewContactForm>,
) -> Result<impl Responder, AppError> {
    let response = state
        .contact_handler
        .create_contact_message(form.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::types::ListingId;
use crate::forms::ConfirmForm;
use crate::forms::ratings::DeleteRatingFormPayload;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::ratings::{
    delete_rating as delete_rating_service, show_ratings as show_ratings_service,
};
use crate::session::{DASHBOARD_PATH, LANDING_PATH, SessionStatus};
use crate::shell::ListingShell;

#[get("/services/{listing_id}/ratings")]
pub async fn show_ratings(
    listing_id: web::Path<String>,
    session: SessionStatus,
    flash_messages: IncomingFlashMessages,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let listing_id = match ListingId::new(listing_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(DASHBOARD_PATH);
        }
    };

    match show_ratings_service(&listing_id, &session, shell.get_ref(), repo.get_ref()) {
        Ok((listing, ratings)) => {
            let mut context = base_context(&flash_messages, &session, "dashboard");
            context.insert("listing", &listing);
            context.insert("ratings", &ratings);
            render_template(&tera, "listings/ratings.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El servicio no existe.").send();
            redirect(DASHBOARD_PATH)
        }
        Err(err) => {
            log::error!("Failed to render ratings page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/services/{listing_id}/ratings/{rating_id}/delete")]
pub async fn delete_rating(
    path: web::Path<(String, String)>,
    session: SessionStatus,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ConfirmForm>,
) -> impl Responder {
    let (listing_id, rating_id) = path.into_inner();
    let back = format!("/services/{listing_id}/ratings");

    let payload = match DeleteRatingFormPayload::from_form(listing_id, rating_id, &form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&back);
        }
    };

    match delete_rating_service(payload, &session, repo.get_ref()) {
        Ok(true) => FlashMessage::success("Comentario eliminado.").send(),
        Ok(false) => FlashMessage::error("Error al eliminar el comentario.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => FlashMessage::error("El comentario no existe.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::warning(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(&back)
}

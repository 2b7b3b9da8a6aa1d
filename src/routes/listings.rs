use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::asset_host::ImgurAssetHost;
use crate::domain::types::ListingId;
use crate::forms::ConfirmForm;
use crate::forms::listings::{
    DeleteListingFormPayload, GalleryUploadForm, GalleryUploadFormPayload, ListingMultipartForm,
    RemoveGalleryImageForm, RemoveGalleryImageFormPayload,
};
use crate::listing_query::{ListingTab, ViewState};
use crate::repository::DieselRepository;
use crate::routes::{back_or, base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::listings::{
    GalleryUpload, add_gallery_images as add_gallery_images_service,
    create_listing as create_listing_service, delete_listing as delete_listing_service,
    refresh_listings as refresh_listings_service,
    remove_gallery_image as remove_gallery_image_service,
    save_listing_edit as save_listing_edit_service, show_dashboard as show_dashboard_service,
    show_listing_editor as show_listing_editor_service,
    toggle_listing_status as toggle_listing_status_service,
};
use crate::session::{DASHBOARD_PATH, LANDING_PATH, Page, RouteDecision, SessionStatus, resolve};
use crate::shell::ListingShell;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub tab: Option<String>,
}

impl From<DashboardQuery> for ViewState {
    fn from(query: DashboardQuery) -> Self {
        ViewState::new(
            query.search.unwrap_or_default(),
            query
                .tab
                .as_deref()
                .map(ListingTab::parse_lenient)
                .unwrap_or_default(),
        )
    }
}

fn edit_path(listing_id: &ListingId) -> String {
    format!("/services/{listing_id}/edit")
}

fn parse_listing_id(raw: String) -> Option<ListingId> {
    match ListingId::new(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            None
        }
    }
}

#[get("/dashboard")]
pub async fn show_dashboard(
    session: SessionStatus,
    flash_messages: IncomingFlashMessages,
    query: web::Query<DashboardQuery>,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let RouteDecision::Redirect(location) = resolve(Page::Dashboard, &session) {
        return redirect(location);
    }

    let view = ViewState::from(query.into_inner());
    match show_dashboard_service(&view, &session, shell.get_ref(), repo.get_ref()) {
        Ok(dashboard) => {
            let mut context = base_context(&flash_messages, &session, "dashboard");
            context.insert("dashboard", &dashboard);
            render_template(&tera, "listings/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect(LANDING_PATH),
        Err(err) => {
            log::error!("Failed to render dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/dashboard/refresh")]
pub async fn refresh_dashboard(
    request: HttpRequest,
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match refresh_listings_service(&session, shell.get_ref(), repo.get_ref()) {
        Ok(()) => FlashMessage::info("Listado actualizado.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(err) => {
            log::error!("Failed to refresh listings: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(back_or(&request, DASHBOARD_PATH))
}

#[post("/services")]
pub async fn create_listing(
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    host: web::Data<ImgurAssetHost>,
    MultipartForm(form): MultipartForm<ListingMultipartForm>,
) -> impl Responder {
    let (payload, image) = match form.into_payload() {
        Ok(parts) => parts,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(DASHBOARD_PATH);
        }
    };

    match create_listing_service(
        payload,
        image,
        &session,
        shell.get_ref(),
        repo.get_ref(),
        host.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Servicio creado.").send(),
        Ok(false) => FlashMessage::error("Error al crear el servicio.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to create listing: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(DASHBOARD_PATH)
}

#[get("/services/{listing_id}/edit")]
pub async fn show_listing_editor(
    listing_id: web::Path<String>,
    session: SessionStatus,
    flash_messages: IncomingFlashMessages,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(listing_id) = parse_listing_id(listing_id.into_inner()) else {
        return redirect(DASHBOARD_PATH);
    };

    match show_listing_editor_service(&listing_id, &session, shell.get_ref(), repo.get_ref()) {
        Ok(listing) => {
            let mut context = base_context(&flash_messages, &session, "dashboard");
            context.insert("listing", &listing);
            render_template(&tera, "listings/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El servicio no existe.").send();
            redirect(DASHBOARD_PATH)
        }
        Err(err) => {
            log::error!("Failed to render listing editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/services/{listing_id}/update")]
pub async fn update_listing(
    listing_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    host: web::Data<ImgurAssetHost>,
    MultipartForm(form): MultipartForm<ListingMultipartForm>,
) -> impl Responder {
    let Some(listing_id) = parse_listing_id(listing_id.into_inner()) else {
        return redirect(DASHBOARD_PATH);
    };
    let back = edit_path(&listing_id);

    let (payload, image) = match form.into_payload() {
        Ok(parts) => parts,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&back);
        }
    };

    match save_listing_edit_service(
        listing_id,
        payload,
        image,
        &session,
        shell.get_ref(),
        repo.get_ref(),
        host.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Servicio actualizado.").send(),
        Ok(false) => FlashMessage::error("Error al guardar el servicio.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El servicio no existe.").send();
            return redirect(DASHBOARD_PATH);
        }
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(&back)
}

#[post("/services/{listing_id}/toggle")]
pub async fn toggle_listing_status(
    request: HttpRequest,
    listing_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let redirect_to = back_or(&request, DASHBOARD_PATH);
    let Some(listing_id) = parse_listing_id(listing_id.into_inner()) else {
        return redirect(redirect_to);
    };

    match toggle_listing_status_service(&listing_id, &session, shell.get_ref(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Estado actualizado.").send(),
        Ok(false) => FlashMessage::error("Error al cambiar el estado.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => FlashMessage::error("El servicio no existe.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(redirect_to)
}

#[post("/services/{listing_id}/delete")]
pub async fn delete_listing(
    listing_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ConfirmForm>,
) -> impl Responder {
    let payload = match DeleteListingFormPayload::from_form(listing_id.into_inner(), &form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(DASHBOARD_PATH);
        }
    };

    match delete_listing_service(payload, &session, shell.get_ref(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Servicio eliminado.").send(),
        Ok(false) => FlashMessage::error("Error al eliminar el servicio.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => FlashMessage::error("El servicio no existe.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::warning(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(DASHBOARD_PATH)
}

#[post("/services/{listing_id}/gallery")]
pub async fn add_gallery_images(
    listing_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    host: web::Data<ImgurAssetHost>,
    MultipartForm(form): MultipartForm<GalleryUploadForm>,
) -> impl Responder {
    let Some(listing_id) = parse_listing_id(listing_id.into_inner()) else {
        return redirect(DASHBOARD_PATH);
    };
    let back = edit_path(&listing_id);

    let payload: GalleryUploadFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&back);
        }
    };

    match add_gallery_images_service(
        listing_id,
        payload,
        &session,
        shell.get_ref(),
        repo.get_ref(),
        host.get_ref(),
    )
    .await
    {
        Ok(GalleryUpload::Appended(count)) => {
            FlashMessage::success(format!("{count} imágenes añadidas a la galería.")).send()
        }
        Ok(GalleryUpload::NothingUploaded) => {
            FlashMessage::error("No se pudo subir ninguna imagen.").send()
        }
        Ok(GalleryUpload::StoreFailed) => {
            FlashMessage::error("Error al guardar la galería.").send()
        }
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El servicio no existe.").send();
            return redirect(DASHBOARD_PATH);
        }
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(&back)
}

#[post("/services/{listing_id}/gallery/remove")]
pub async fn remove_gallery_image(
    listing_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<ListingShell>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RemoveGalleryImageForm>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();
    let back = format!("/services/{listing_id}/edit");

    let payload = match RemoveGalleryImageFormPayload::from_form(listing_id, form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&back);
        }
    };

    match remove_gallery_image_service(payload, &session, shell.get_ref(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Imagen eliminada de la galería.").send(),
        Ok(false) => FlashMessage::error("Error al eliminar la imagen.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("La imagen no está en la galería.").send()
        }
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(&back)
}

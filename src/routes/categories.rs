use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::asset_host::ImgurAssetHost;
use crate::domain::types::CategoryId;
use crate::forms::ConfirmForm;
use crate::forms::categories::{CategoryMultipartForm, DeleteCategoryFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    show_categories as show_categories_service, update_category as update_category_service,
};
use crate::session::{LANDING_PATH, SessionStatus};
use crate::shell::CategoryShell;

const CATEGORIES_PATH: &str = "/categories";

#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    pub edit: Option<String>,
}

#[get("/categories")]
pub async fn show_categories(
    session: SessionStatus,
    flash_messages: IncomingFlashMessages,
    query: web::Query<CategoriesQuery>,
    shell: web::Data<CategoryShell>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let editing = query
        .into_inner()
        .edit
        .and_then(|id| CategoryId::new(id).ok());

    match show_categories_service(editing.as_ref(), &session, shell.get_ref(), repo.get_ref()) {
        Ok((categories, editing)) => {
            let mut context = base_context(&flash_messages, &session, "categories");
            context.insert("categories", &categories);
            context.insert("editing", &editing);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect(LANDING_PATH),
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categories")]
pub async fn add_category(
    session: SessionStatus,
    shell: web::Data<CategoryShell>,
    repo: web::Data<DieselRepository>,
    host: web::Data<ImgurAssetHost>,
    MultipartForm(form): MultipartForm<CategoryMultipartForm>,
) -> impl Responder {
    let (payload, icon) = match form.into_payload() {
        Ok(parts) => parts,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PATH);
        }
    };

    match add_category_service(
        payload,
        icon,
        &session,
        shell.get_ref(),
        repo.get_ref(),
        host.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Categoría creada.").send(),
        Ok(false) => FlashMessage::error("Error al crear la categoría.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => FlashMessage::error("La categoría no existe.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(CATEGORIES_PATH)
}

#[post("/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<CategoryShell>,
    repo: web::Data<DieselRepository>,
    host: web::Data<ImgurAssetHost>,
    MultipartForm(form): MultipartForm<CategoryMultipartForm>,
) -> impl Responder {
    let category_id = match CategoryId::new(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PATH);
        }
    };

    let (payload, icon) = match form.into_payload() {
        Ok(parts) => parts,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("{CATEGORIES_PATH}?edit={category_id}"));
        }
    };

    match update_category_service(
        category_id,
        payload,
        icon,
        &session,
        shell.get_ref(),
        repo.get_ref(),
        host.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Categoría actualizada.").send(),
        Ok(false) => FlashMessage::error("Error al actualizar la categoría.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => FlashMessage::error("La categoría no existe.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(CATEGORIES_PATH)
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<String>,
    session: SessionStatus,
    shell: web::Data<CategoryShell>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ConfirmForm>,
) -> impl Responder {
    let payload = match DeleteCategoryFormPayload::from_form(category_id.into_inner(), &form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_PATH);
        }
    };

    match delete_category_service(payload, &session, shell.get_ref(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Categoría eliminada.").send(),
        Ok(false) => FlashMessage::error("Error al eliminar la categoría.").send(),
        Err(ServiceError::Unauthorized) => return redirect(LANDING_PATH),
        Err(ServiceError::NotFound) => FlashMessage::error("La categoría no existe.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::warning(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(CATEGORIES_PATH)
}

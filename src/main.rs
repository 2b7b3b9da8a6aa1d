use std::io;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use pedilo_admin::asset_host::ImgurAssetHost;
use pedilo_admin::db::{establish_connection_pool, run_migrations};
use pedilo_admin::identity::RestIdentityProvider;
use pedilo_admin::models::config::ServerConfig;
use pedilo_admin::repository::DieselRepository;
use pedilo_admin::routes::categories::{
    add_category, delete_category, show_categories, update_category,
};
use pedilo_admin::routes::listings::{
    add_gallery_images, create_listing, delete_listing, refresh_dashboard, remove_gallery_image,
    show_dashboard, show_listing_editor, toggle_listing_status, update_listing,
};
use pedilo_admin::routes::main::{index, login, logout, not_found};
use pedilo_admin::routes::ratings::{delete_rating, show_ratings};
use pedilo_admin::session::SessionState;
use pedilo_admin::shell::{CategoryShell, ListingShell};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&config.database_url).map_err(|e| {
        log::error!("Failed to open database {}: {e}", config.database_url);
        io::Error::other(e)
    })?;
    run_migrations(&pool).map_err(|e| {
        log::error!("Failed to run migrations: {e}");
        io::Error::other(e.to_string())
    })?;

    let tera = Tera::new(&config.templates_dir).map_err(|e| {
        log::error!("Failed to load templates from {}: {e}", config.templates_dir);
        io::Error::other(e)
    })?;

    let secret_key = Key::try_from(config.secret.as_bytes()).unwrap_or_else(|e| {
        log::warn!("Configured secret is unusable ({e}); cookies will not survive a restart");
        Key::generate()
    });

    let sessions = web::Data::new(SessionState::init());
    let mut session_changes = sessions.subscribe();
    actix_web::rt::spawn(async move {
        while session_changes.changed().await.is_ok() {
            let active = session_changes.borrow_and_update().len();
            log::debug!("Session change: {active} operator(s) signed in");
        }
    });

    let repo = web::Data::new(DieselRepository::new(pool));
    let listing_shell = web::Data::new(ListingShell::default());
    let category_shell = web::Data::new(CategoryShell::default());
    let asset_host = web::Data::new(ImgurAssetHost::new(&config.asset_host));
    let identity = web::Data::new(RestIdentityProvider::new(&config.identity));
    let tera = web::Data::new(tera);
    let static_dir = config.static_dir.clone();

    let server = {
        let sessions = sessions.clone();
        let listing_shell = listing_shell.clone();
        let category_shell = category_shell.clone();

        HttpServer::new(move || {
            let message_store = CookieMessageStore::builder(secret_key.clone()).build();
            let message_framework = FlashMessagesFramework::builder(message_store).build();

            App::new()
                .wrap(message_framework)
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Logger::default())
                .app_data(repo.clone())
                .app_data(listing_shell.clone())
                .app_data(category_shell.clone())
                .app_data(sessions.clone())
                .app_data(asset_host.clone())
                .app_data(identity.clone())
                .app_data(tera.clone())
                .service(Files::new("/assets", &static_dir))
                .service(index)
                .service(login)
                .service(logout)
                .service(show_dashboard)
                .service(refresh_dashboard)
                .service(create_listing)
                .service(show_listing_editor)
                .service(update_listing)
                .service(toggle_listing_status)
                .service(delete_listing)
                .service(add_gallery_images)
                .service(remove_gallery_image)
                .service(show_ratings)
                .service(delete_rating)
                .service(show_categories)
                .service(add_category)
                .service(update_category)
                .service(delete_category)
                .default_service(web::to(not_found))
        })
        .bind((config.address.as_str(), config.port))?
        .run()
    };

    log::info!("Listening on {}:{}", config.address, config.port);
    let result = server.await;

    sessions.teardown();
    listing_shell.teardown();
    category_shell.teardown();
    result
}

use std::{process, sync::Arc, time::Duration};

use blockflare::{
    application::{
        auth::AuthService,
        chrome::ChromeService,
        console::ConsoleService,
        error::AppError,
        feed::FeedService,
        render::{MarkdownRenderer, RenderConfig},
        repos::{MetadataRepo, PostsRepo, PostsWriteRepo},
        uploads::UploadService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
        uploads::UploadStorage,
    },
};
use tokio::signal;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let auth = build_auth_service(&settings.auth)?;
    let repositories = init_repositories(&settings).await?;
    let state = build_http_state(repositories, auth, &settings)?;
    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_pool(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(target = "blockflare::migrate", "Migrations applied");
    Ok(())
}

fn build_auth_service(auth: &config::AuthSettings) -> Result<AuthService, AppError> {
    let secret = auth
        .jwt_secret
        .as_deref()
        .ok_or_else(|| InfraError::configuration("auth.jwt_secret is not configured"))?;

    if auth.account.is_none() || auth.password.is_none() {
        warn!(
            target = "blockflare::auth",
            "auth.account or auth.password is missing; console login is disabled"
        );
    }
    if !auth.secure_cookie {
        warn!(
            target = "blockflare::auth",
            "session cookie is issued without the Secure attribute"
        );
    }

    Ok(AuthService::new(
        auth.account.clone(),
        auth.password.clone(),
        secret.as_bytes(),
    ))
}

async fn connect_pool(settings: &config::Settings) -> Result<sqlx::PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = connect_pool(settings).await?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_http_state(
    repositories: Arc<PostgresRepositories>,
    auth: AuthService,
    settings: &config::Settings,
) -> Result<HttpState, AppError> {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let metadata_repo: Arc<dyn MetadataRepo> = repositories.clone();

    let renderer = Arc::new(MarkdownRenderer::new(RenderConfig::from(&settings.render)));

    let upload_storage = Arc::new(
        UploadStorage::new(settings.uploads.directory.clone())
            .map_err(|err| AppError::from(InfraError::Io(err)))?,
    );
    let upload_body_limit = usize::try_from(settings.uploads.max_request_bytes.get())
        .map_err(|_| AppError::validation("uploads.max_request_bytes exceeds platform limits"))?;

    Ok(HttpState {
        feed: Arc::new(FeedService::new(posts_repo.clone(), renderer.clone())),
        chrome: Arc::new(ChromeService::new(metadata_repo, renderer)),
        console: Arc::new(ConsoleService::new(posts_repo, posts_write_repo)),
        uploads: Arc::new(UploadService::new(
            upload_storage.clone(),
            settings.uploads.public_base_url.clone(),
        )),
        upload_storage,
        auth,
        db: repositories,
        secure_cookie: settings.auth.secure_cookie,
        upload_body_limit,
    })
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "blockflare::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(settings.server.graceful_shutdown))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "blockflare::serve", "Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. In-flight requests get `grace` before the process exits.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(target = "blockflare::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(target = "blockflare::serve", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        target = "blockflare::serve",
        grace_seconds = grace.as_secs(),
        "Shutdown signal received"
    );
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!(target = "blockflare::serve", "Graceful shutdown window elapsed");
        process::exit(0);
    });
}

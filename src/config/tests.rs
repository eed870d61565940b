use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_are_usable_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.uploads.public_base_url, "/uploads");
    assert_eq!(
        settings.uploads.max_request_bytes.get(),
        DEFAULT_UPLOAD_REQUEST_LIMIT_BYTES
    );
    assert!(settings.auth.secure_cookie);
    assert!(settings.auth.jwt_secret.is_none());
    assert!(settings.render.highlight_code);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn short_jwt_secret_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("tiny".to_string());

    let err = Settings::from_raw(raw).expect_err("short secret");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "auth.jwt_secret",
            ..
        }
    ));
}

#[test]
fn blank_credentials_resolve_to_none() {
    let mut raw = RawSettings::default();
    raw.auth.account = Some("   ".to_string());
    raw.database.url = Some(String::new());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.auth.account.is_none());
    assert!(settings.database.url.is_none());
}

#[test]
fn upload_base_url_must_be_url_or_absolute_path() {
    let mut raw = RawSettings::default();
    raw.uploads.public_base_url = Some("cdn.example.com".to_string());
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.uploads.public_base_url = Some("https://cdn.example.com/".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.uploads.public_base_url, "https://cdn.example.com");
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["blockflare"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "blockflare",
        "serve",
        "--server-port",
        "9000",
        "--database-url",
        "postgres://localhost/blog",
        "--auth-secure-cookie",
        "false",
    ]);

    let Some(Command::Serve(serve)) = args.command else {
        panic!("expected serve command");
    };
    assert_eq!(serve.overrides.server_port, Some(9000));
    assert_eq!(
        serve.overrides.database.database_url.as_deref(),
        Some("postgres://localhost/blog")
    );
    assert_eq!(serve.overrides.auth_secure_cookie, Some(false));
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from([
        "blockflare",
        "migrate",
        "--database-url",
        "postgres://localhost/blog",
    ]);

    let Some(Command::Migrate(migrate)) = args.command else {
        panic!("expected migrate command");
    };
    assert_eq!(
        migrate.database.database_url.as_deref(),
        Some("postgres://localhost/blog")
    );
}

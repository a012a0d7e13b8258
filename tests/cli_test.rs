//! CLI Command Tests
//!
//! Tests for all CLI commands with a mocked backend.
//! Covers argument parsing, exit codes and the theme setting.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use moviemanager::cli::{Cli, Command, KindArg, LinkOp, PropertyOp, ThemeArg};

    #[test]
    fn test_movies_alias() {
        let cli = Cli::parse_from(["moviemanager", "ls"]);
        assert!(cli.is_cli_mode());
        assert!(matches!(cli.command, Some(Command::Movies)));
    }

    #[test]
    fn test_remove_with_yes() {
        let cli = Cli::parse_from(["moviemanager", "rm", "2", "-y"]);
        match cli.command {
            Some(Command::Remove(cmd)) => {
                assert_eq!(cmd.id, 2);
                assert!(cmd.yes);
            }
            _ => panic!("Expected Remove command"),
        }
    }

    #[test]
    fn test_category_command() {
        let cli = Cli::parse_from(["moviemanager", "category", "add", "2", "1"]);
        match cli.command {
            Some(Command::Category(cmd)) => {
                assert_eq!(cmd.op, LinkOp::Add);
                assert_eq!(cmd.movie_id, 2);
                assert_eq!(cmd.other_id, 1);
            }
            _ => panic!("Expected Category command"),
        }
    }

    #[test]
    fn test_property_update() {
        let cli = Cli::parse_from([
            "moviemanager",
            "prop",
            "update",
            "series",
            "--id",
            "2",
            "--name",
            "Saw Saga",
        ]);
        match cli.command {
            Some(Command::Property(cmd)) => {
                assert_eq!(cmd.op, PropertyOp::Update);
                assert_eq!(cmd.kind, KindArg::Series);
                assert_eq!(cmd.id, Some(2));
                assert_eq!(cmd.name.as_deref(), Some("Saw Saga"));
            }
            _ => panic!("Expected Property command"),
        }
    }

    #[test]
    fn test_theme_without_mode() {
        let cli = Cli::parse_from(["moviemanager", "theme"]);
        match cli.command {
            Some(Command::Theme(cmd)) => assert!(cmd.mode.is_none()),
            _ => panic!("Expected Theme command"),
        }
        let cli = Cli::parse_from(["moviemanager", "theme", "toggle"]);
        match cli.command {
            Some(Command::Theme(cmd)) => assert_eq!(cmd.mode, Some(ThemeArg::Toggle)),
            _ => panic!("Expected Theme command"),
        }
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::parse_from(["moviemanager", "movies", "-c", "/tmp/mm.toml"]);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/mm.toml"))
        );
    }

    #[test]
    fn test_update_clear_flags() {
        let cli = Cli::parse_from([
            "moviemanager",
            "update",
            "2",
            "--clear-studio",
            "-n",
            "Saw II",
        ]);
        match cli.command {
            Some(Command::Update(cmd)) => {
                assert!(cmd.clear_studio);
                assert!(!cmd.clear_series);
                assert_eq!(cmd.studio_id, None);
                assert_eq!(cmd.name.as_deref(), Some("Saw II"));
            }
            _ => panic!("Expected Update command"),
        }

        let result = Cli::try_parse_from([
            "moviemanager",
            "update",
            "2",
            "--studio-id",
            "5",
            "--clear-studio",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_link_op_rejected() {
        let result = Cli::try_parse_from(["moviemanager", "actor", "swap", "2", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let result = Cli::try_parse_from(["moviemanager", "show", "saw"]);
        assert!(result.is_err());
    }
}

// =============================================================================
// Command Exit Code Tests
// =============================================================================

mod command_exit_codes {
    use mockito::{Matcher, Server, ServerGuard};
    use moviemanager::api::MovieManagerClient;
    use moviemanager::cli::{
        AssociationCmd, ExitCode, KindArg, LinkOp, Output, PropertyCmd, PropertyOp, RemoveCmd,
        ShowCmd, UpdateCmd,
    };
    use moviemanager::commands;

    const SAW: &str = r#"{
        "id": 2,
        "filename": "[Twisted] {Saw 1} Saw (Danny Glover).mp4",
        "name": "Saw",
        "actors": [{"id": 5, "name": "Danny Glover"}],
        "categories": [{"id": 1, "name": "Horror"}],
        "series": {"id": 2, "name": "Saw"},
        "series_number": 1,
        "studio": {"id": 5, "name": "Twisted"}
    }"#;

    fn output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    async fn backend() -> ServerGuard {
        let mut server = Server::new_async().await;
        let fixtures = [
            ("/movies", r#"[{"id": 2, "filename": "[Twisted] {Saw 1} Saw (Danny Glover).mp4"}]"#),
            ("/movies/2", SAW),
            ("/actors", r#"[{"id": 1, "name": "Al Pacino"}, {"id": 5, "name": "Danny Glover"}]"#),
            ("/categories", r#"[{"id": 1, "name": "Horror"}, {"id": 2, "name": "Crime"}]"#),
            ("/studios", r#"[{"id": 5, "name": "Twisted"}]"#),
        ];
        for (path, body) in fixtures {
            server
                .mock("GET", path)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create_async()
                .await;
        }
        server
    }

    fn client(server: &ServerGuard) -> MovieManagerClient {
        MovieManagerClient::new(server.url())
    }

    #[tokio::test]
    async fn test_movies_success() {
        let server = backend().await;
        let code = commands::movies_cmd(client(&server), &output()).await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = MovieManagerClient::new("http://127.0.0.1:9");
        let code = commands::movies_cmd(client, &output()).await;
        assert_eq!(code, ExitCode::NetworkError);
    }

    #[tokio::test]
    async fn test_show_missing_movie() {
        let mut server = backend().await;
        server
            .mock("GET", "/movies/99")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": {"message": "Movie not found"}}"#)
            .create_async()
            .await;

        let code = commands::show_cmd(ShowCmd { id: 99 }, client(&server), &output()).await;
        assert_eq!(code, ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_actor_add_success() {
        let mut server = backend().await;
        let mock = server
            .mock("POST", "/movie_actor")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("movie_id".into(), "2".into()),
                Matcher::UrlEncoded("actor_id".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAW)
            .create_async()
            .await;

        let cmd = AssociationCmd {
            op: LinkOp::Add,
            movie_id: 2,
            other_id: 1,
        };
        let code = commands::actor_cmd(cmd, client(&server), &output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_actor_conflict_is_rejected() {
        let mut server = backend().await;
        server
            .mock("POST", "/movie_actor")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": {"message": "Actor Danny Glover is already in Saw"}}"#)
            .create_async()
            .await;

        let cmd = AssociationCmd {
            op: LinkOp::Add,
            movie_id: 2,
            other_id: 5,
        };
        let code = commands::actor_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::Rejected);
    }

    #[tokio::test]
    async fn test_category_remove() {
        let mut server = backend().await;
        let mock = server
            .mock("DELETE", "/movie_category")
            .match_query(Matcher::UrlEncoded("category_id".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAW.replace(r#"[{"id": 1, "name": "Horror"}]"#, "[]"))
            .create_async()
            .await;

        let cmd = AssociationCmd {
            op: LinkOp::Remove,
            movie_id: 2,
            other_id: 1,
        };
        let code = commands::category_cmd(cmd, client(&server), &output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_update_validation_is_rejected() {
        let mut server = backend().await;
        server
            .mock("PUT", "/movies/2")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": [{"loc": ["body", "series_number"], "msg": "Input should be greater than 0"}]}"#)
            .create_async()
            .await;

        let cmd = UpdateCmd {
            id: 2,
            name: Some("Saw".into()),
            series_id: Some(2),
            series_number: Some(-1),
            ..Default::default()
        };
        let code = commands::update_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::Rejected);
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let mut server = backend().await;
        let mock = server
            .mock("PUT", "/movies/2")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Saw II",
                "series_id": 2,
                "series_number": 1,
                "studio_id": 5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAW.replace(r#""name": "Saw","#, r#""name": "Saw II","#))
            .create_async()
            .await;

        let cmd = UpdateCmd {
            id: 2,
            name: Some("Saw II".into()),
            ..Default::default()
        };
        let code = commands::update_cmd(cmd, client(&server), &output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_update_clear_flags_send_null() {
        let mut server = backend().await;
        let mock = server
            .mock("PUT", "/movies/2")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Saw",
                "series_id": null,
                "series_number": null,
                "studio_id": 5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAW)
            .create_async()
            .await;

        let cmd = UpdateCmd {
            id: 2,
            clear_series: true,
            clear_series_number: true,
            ..Default::default()
        };
        let code = commands::update_cmd(cmd, client(&server), &output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_remove_confirmed() {
        let mut server = backend().await;
        let mock = server
            .mock("DELETE", "/movies/2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Movie removed"}"#)
            .create_async()
            .await;

        let cmd = RemoveCmd { id: 2, yes: true };
        let code = commands::remove_cmd(cmd, client(&server), &output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_import() {
        let mut server = backend().await;
        server
            .mock("POST", "/movies")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let code = commands::import_cmd(client(&server), &output()).await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_property_list() {
        let server = backend().await;
        let cmd = PropertyCmd {
            op: PropertyOp::List,
            kind: KindArg::Studio,
            id: None,
            name: None,
        };
        let code = commands::property_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_property_add_without_name() {
        let server = backend().await;
        let cmd = PropertyCmd {
            op: PropertyOp::Add,
            kind: KindArg::Actor,
            id: None,
            name: None,
        };
        let code = commands::property_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_property_update_without_id() {
        let server = backend().await;
        let cmd = PropertyCmd {
            op: PropertyOp::Update,
            kind: KindArg::Category,
            id: None,
            name: Some("Thriller".into()),
        };
        let code = commands::property_cmd(cmd, client(&server), &output()).await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_property_remove_unknown_id() {
        let mut server = backend().await;
        let delete = server
            .mock("DELETE", Matcher::Regex(r"^/actors/".to_string()))
            .expect(0)
            .create_async()
            .await;

        let cmd = PropertyCmd {
            op: PropertyOp::Remove,
            kind: KindArg::Actor,
            id: Some(42),
            name: None,
        };
        let code = commands::property_cmd(cmd, client(&server), &output()).await;

        delete.assert_async().await;
        assert_eq!(code, ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_property_rename() {
        let mut server = backend().await;
        let mock = server
            .mock("PUT", "/categories/2")
            .match_body(Matcher::JsonString(r#"{"name": "Heist"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 2, "name": "Heist"}"#)
            .create_async()
            .await;

        let cmd = PropertyCmd {
            op: PropertyOp::Update,
            kind: KindArg::Category,
            id: Some(2),
            name: Some("Heist".into()),
        };
        let code = commands::property_cmd(cmd, client(&server), &output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }
}

// =============================================================================
// Theme Command Tests
// =============================================================================

mod theme_setting {
    use moviemanager::cli::{ExitCode, Output, ThemeArg, ThemeCmd};
    use moviemanager::commands;
    use moviemanager::config::Config;
    use moviemanager::store::ThemeMode;
    use tempfile::TempDir;

    fn output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    #[test]
    fn test_theme_set_and_toggle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let code = commands::theme_cmd(
            ThemeCmd {
                mode: Some(ThemeArg::Dark),
            },
            Some(&path),
            &output(),
        );
        assert_eq!(code, ExitCode::Success);
        assert_eq!(Config::load_from(&path).theme, ThemeMode::Dark);

        commands::theme_cmd(
            ThemeCmd {
                mode: Some(ThemeArg::Toggle),
            },
            Some(&path),
            &output(),
        );
        assert_eq!(Config::load_from(&path).theme, ThemeMode::Light);
    }

    #[test]
    fn test_theme_show_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let code = commands::theme_cmd(ThemeCmd { mode: None }, Some(&path), &output());
        assert_eq!(code, ExitCode::Success);
        assert!(!path.exists());
    }
}

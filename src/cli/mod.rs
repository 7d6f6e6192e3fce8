pub mod commands;

use crate::api::AppInfo;
use crate::store::DatabaseSettings;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "tpk-backend")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Items API with health probes, Prometheus metrics and Kubernetes service account checks", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[command(flatten)]
    pub app: AppArgs,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,
    #[command(about = "Create the items table and print its structure")]
    InitDb,
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(
        long,
        global = true,
        env = "LISTEN_ADDR",
        default_value = "0.0.0.0:8000",
        help = "Address to listen on"
    )]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        global = true,
        env = "TEST_POD_NAMESPACE",
        default_value = "todolist",
        help = "Namespace test pods are created in"
    )]
    pub namespace: String,
}

#[derive(Args, Debug, Clone)]
pub struct AppArgs {
    #[arg(
        long,
        global = true,
        env = "APP_NAME",
        default_value = "tp-kubernetes-backend",
        help = "Service name reported by probes and /version"
    )]
    pub app_name: String,

    #[arg(
        long,
        global = true,
        env = "APP_VERSION",
        default_value = "1.0.0",
        help = "Version reported by /version"
    )]
    pub app_version: String,
}

impl AppArgs {
    pub fn info(&self) -> AppInfo {
        AppInfo {
            name: self.app_name.clone(),
            version: self.app_version.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    #[arg(long, global = true, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, global = true, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    #[arg(long, global = true, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    #[arg(
        long,
        global = true,
        env = "DB_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub db_password: String,

    #[arg(long, global = true, env = "DB_NAME", default_value = "tpkubernetes")]
    pub db_name: String,
}

impl DatabaseArgs {
    pub fn settings(&self) -> DatabaseSettings {
        DatabaseSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            name: self.db_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::try_parse_from([
            "tpk-backend",
            "--db-host",
            "postgres.todolist.svc",
            "--db-port",
            "6543",
            "--app-name",
            "backend",
            "serve",
            "--listen-addr",
            "127.0.0.1:9000",
            "--namespace",
            "sandbox",
        ])
        .unwrap();

        assert_eq!(cli.database.db_host, "postgres.todolist.svc");
        assert_eq!(cli.database.db_port, 6543);
        assert_eq!(cli.app.info().name, "backend");

        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(
            cli.server.listen_addr,
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(cli.server.namespace, "sandbox");
    }

    #[test]
    fn test_global_database_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tpk-backend", "init-db", "--db-name", "scratch"]).unwrap();

        assert!(matches!(cli.command, Some(Commands::InitDb)));
        assert_eq!(cli.database.settings().name, "scratch");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["tpk-backend", "--db-port", "not-a-port"]).is_err());
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["tpk-backend", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

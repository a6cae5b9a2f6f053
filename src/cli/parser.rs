use clap::{Parser, Subcommand};

pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://itemlist.db?mode=rwc";
pub const DEFAULT_COLLECTION: &str = crate::core::models::DEFAULT_COLLECTION;

#[derive(Debug, Parser)]
#[command(name = "itemlist", version, about = "Signed-in CRUD list of items")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, default_value = DEFAULT_BACKEND)]
    pub backend: String,

    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    #[arg(long, default_value_t = false, global = true)]
    pub json: bool,

    #[arg(long, default_value_t = false, global = true)]
    pub quiet: bool,

    #[arg(long, default_value_t = false, global = true)]
    pub no_color: bool,

    /// 0 waits forever.
    #[arg(long, default_value_t = 30, global = true)]
    pub remote_timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    SignUp { email: String },
    SignIn { email: String },
    SignOut,
    Whoami,
    List,
    Add { name: String },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    Interactive,
    Config,
}

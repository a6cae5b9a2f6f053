pub mod auth {
    pub mod identity;
    pub mod keyring;
    pub mod local;
}

pub mod cli {
    pub mod commands;
    pub mod display;
    pub mod parser;
    pub mod prompts;
    pub mod runtime_config;
    pub mod table;
}

pub mod core {
    pub mod credentials;
    pub mod errors;
    pub mod models;
    pub mod remote;
}

pub mod storage {
    pub mod app;
    pub mod mongo;
    pub mod postgres;
    pub mod sqlite;
    pub mod r#trait;
}

pub mod view {
    pub mod auth_gate;
    pub mod item_list;
    pub mod login_form;
    pub mod session;
}

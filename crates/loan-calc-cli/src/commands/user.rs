use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::{json, Value};

use loan_calc_core::credentials::{Authenticator, JsonFileCredentialStore};

#[derive(Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    /// JSON file holding salted password hashes
    #[arg(long, default_value = "users.json")]
    pub store: PathBuf,
}

pub type LoginArgs = CredentialArgs;

fn authenticator(
    store: &Path,
) -> Result<Authenticator<JsonFileCredentialStore>, Box<dyn std::error::Error>> {
    Ok(Authenticator::new(JsonFileCredentialStore::open(store)?))
}

pub fn run_register(args: CredentialArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let auth = authenticator(&args.store)?;
    auth.register(&args.username, &args.password)?;
    Ok(json!({ "result": { "registered": args.username.trim() } }))
}

pub fn run_login(args: LoginArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let auth = authenticator(&args.store)?;
    let session = auth.login(&args.username, &args.password)?;
    Ok(json!({ "result": session }))
}

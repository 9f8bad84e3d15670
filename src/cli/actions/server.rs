use crate::{
    api::{self, PublicDir},
    cli::commands::store::StoreKind,
    users::{JsonFileStore, MemoryStore, RegistrationProfile, Sha256Hasher, UserService, UserStore},
};
use anyhow::Result;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store: StoreKind,
    pub public_dir: PathBuf,
    pub registration_profile: RegistrationProfile,
}

/// Build the user service described by `args`.
#[must_use]
pub fn build_service(args: &Args) -> UserService {
    let store: Arc<dyn UserStore> = match &args.store {
        StoreKind::File(path) => {
            info!("Using users file {}", path.display());
            Arc::new(JsonFileStore::new(path.clone()))
        }
        StoreKind::Memory => {
            warn!("Using in-memory user store, users are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    UserService::new(store, Arc::new(Sha256Hasher)).with_profile(args.registration_profile)
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    if !args.public_dir.is_dir() {
        warn!(
            "Public directory {} not found, static requests will return 404",
            args.public_dir.display()
        );
    }

    let service = Arc::new(build_service(&args));
    info!("Registration profile: {}", service.profile());

    api::new(args.port, service, PublicDir::new(args.public_dir)).await
}

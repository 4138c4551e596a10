use clap::Parser;
use docker_registry_client::{error, repository::Repository, uri::Reference};

use super::context::Ctx;

#[derive(Parser, Debug)]
#[command(about = "Delete an image", long_about = None)]
pub struct Delete {
    /// Repository (eg. namespace/repo)
    repository: String,
    /// Tag or digest
    reference: Reference,
}

impl Delete {
    pub async fn run(&self, ctx: &Ctx) -> Result<(), error::Error> {
        let registry = ctx.registry();
        let repository = Repository::new(&registry, &self.repository);
        let digest = repository.delete(&self.reference).await?;
        println!("Image {} deleted", digest);
        Ok(())
    }
}

use clap::Parser;

use docker_registry_client::error;
use docker_registry_client::repository::Repository;

use super::context::Ctx;

#[derive(Parser, Debug)]
#[clap(about = "List tags", long_about = None)]
pub struct Tags {
    /// Repository (eg. namespace/repo)
    repository: String,
}

impl Tags {
    pub async fn run(&self, ctx: &Ctx) -> Result<(), error::Error> {
        let registry = ctx.registry();
        let repository = Repository::new(&registry, &self.repository);
        let tags = repository.tags().await?;
        if !tags.is_empty() {
            println!("{}", tags.join("\n"));
        }
        Ok(())
    }
}

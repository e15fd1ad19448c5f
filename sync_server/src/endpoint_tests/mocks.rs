use mockall::mock;
use sync_engine::{CatalogError, ProductCatalog, ProductSnapshot, SyncIntent, SystemKind};

mock! {
    pub Catalog {}
    impl ProductCatalog for Catalog {
        fn system(&self) -> SystemKind;
        async fn fetch_snapshot(&self, sku: &str) -> Result<ProductSnapshot, CatalogError>;
        async fn apply_intent(&self, intent: &SyncIntent) -> Result<(), CatalogError>;
    }
}

use async_trait::async_trait;
use mockall::mock;

use dispatch_core::errors::DispatchResult;
use dispatch_core::models::user::DirectoryUser;

use crate::directory::UserDirectory;

// Mock user directory for testing engine operations without directory files.
// `exists` is left to the trait default, so it goes through the mocked `find`.
mock! {
    pub Directory {}

    #[async_trait]
    impl UserDirectory for Directory {
        async fn find(&self, email: &str) -> DispatchResult<Option<DirectoryUser>>;

        async fn all(&self) -> DispatchResult<Vec<DirectoryUser>>;
    }
}

#[cfg(test)]
pub mod test_helpers {
    use crate::settings::open_settings;
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    pub struct TestContext {
        pub pool: SqlitePool,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let pool = open_settings(temp_dir.path()).await.unwrap();

            Self {
                pool,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }

        pub fn data_dir(&self) -> &std::path::Path {
            self._temp_dir.path()
        }
    }
}

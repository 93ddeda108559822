use actlog_core::{ActivityLog, ActivityLogStore, ServiceResult};

pub struct CreateActivityLogCommand {
    pub user_id: String,
    pub action_type: String,
    pub description: String,
}

/// Stateless facade over the store, built per request.
pub struct ActivityLogService<'a, S: ActivityLogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ActivityLogStore + ?Sized> ActivityLogService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn user_exists(&self, user_id: &str) -> ServiceResult<bool> {
        self.store.user_exists(user_id).await
    }

    /// Persists a new log. The caller checks that the user exists first.
    pub async fn create(&self, command: CreateActivityLogCommand) -> ServiceResult<ActivityLog> {
        let log = ActivityLog::new(command.user_id, command.action_type, command.description);
        self.store.create_activity_log(&log).await?;
        Ok(log)
    }

    pub async fn logs_for_user(&self, user_id: &str) -> ServiceResult<Vec<ActivityLog>> {
        self.store.list_activity_logs_by_user(user_id).await
    }

    pub async fn all_logs(&self) -> ServiceResult<Vec<ActivityLog>> {
        self.store.list_activity_logs().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actlog_core::ServiceError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecStore {
        users: Vec<String>,
        logs: Mutex<Vec<ActivityLog>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl ActivityLogStore for VecStore {
        async fn user_exists(&self, user_id: &str) -> ServiceResult<bool> {
            Ok(self.users.iter().any(|id| id == user_id))
        }

        async fn create_activity_log(&self, log: &ActivityLog) -> ServiceResult<()> {
            if self.fail_writes {
                return Err(ServiceError::new("db_error", "write failed"));
            }
            self.logs.lock().expect("lock").push(log.clone());
            Ok(())
        }

        async fn list_activity_logs_by_user(
            &self,
            user_id: &str,
        ) -> ServiceResult<Vec<ActivityLog>> {
            Ok(self
                .logs
                .lock()
                .expect("lock")
                .iter()
                .filter(|log| log.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn list_activity_logs(&self) -> ServiceResult<Vec<ActivityLog>> {
            Ok(self.logs.lock().expect("lock").clone())
        }
    }

    fn command(user_id: &str, action_type: &str) -> CreateActivityLogCommand {
        CreateActivityLogCommand {
            user_id: user_id.to_string(),
            action_type: action_type.to_string(),
            description: format!("{action_type} by {user_id}"),
        }
    }

    #[tokio::test]
    async fn create_returns_persisted_log() {
        let store = VecStore {
            users: vec!["u1".to_string()],
            ..VecStore::default()
        };
        let service = ActivityLogService::new(&store);

        let log = service.create(command("u1", "login")).await.expect("create");
        assert_eq!(log.user_id, "u1");
        assert_eq!(log.description, "login by u1");
        assert_eq!(service.all_logs().await.expect("all"), vec![log]);
    }

    #[tokio::test]
    async fn logs_for_user_only_returns_that_user() {
        let store = VecStore {
            users: vec!["u1".to_string(), "u2".to_string()],
            ..VecStore::default()
        };
        let service = ActivityLogService::new(&store);
        let mine = service.create(command("u1", "login")).await.expect("create");
        service.create(command("u2", "login")).await.expect("create");

        assert_eq!(service.logs_for_user("u1").await.expect("list"), vec![mine]);
        assert!(service.logs_for_user("u3").await.expect("list").is_empty());
        assert!(service.user_exists("u2").await.expect("exists"));
        assert!(!service.user_exists("u3").await.expect("exists"));
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = VecStore {
            fail_writes: true,
            ..VecStore::default()
        };
        let err = ActivityLogService::new(&store)
            .create(command("u1", "login"))
            .await
            .expect_err("write should fail");
        assert_eq!(err.kind, "db_error");
    }
}

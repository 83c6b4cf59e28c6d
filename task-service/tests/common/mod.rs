use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordCost;
use auth::PasswordHasher;
use task_service::domain::task::errors::TaskError;
use task_service::domain::task::models::NewTask;
use task_service::domain::task::models::Task;
use task_service::domain::task::models::TaskId;
use task_service::domain::task::models::UpdateTaskCommand;
use task_service::domain::task::ports::TaskRepository;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::errors::UserError;
use task_service::domain::user::models::NewUser;
use task_service::domain::user::models::User;
use task_service::domain::user::models::UserId;
use task_service::domain::user::models::Username;
use task_service::domain::user::ports::UserRepository;
use task_service::domain::user::service::UserService;
use task_service::inbound::http::router::create_router;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Minimal Argon2 cost keeps the suite fast
        let password_hasher = PasswordHasher::with_cost(PasswordCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET)
                .expect("Failed to create authenticator")
                .with_password_hasher(password_hasher),
        );

        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::clone(&authenticator),
        ));
        let task_service = Arc::new(TaskService::new(Arc::new(
            InMemoryTaskRepository::default(),
        )));

        let router = create_router(user_service, task_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user and return the login token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/register")
            .json(&serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        self.login(username, password).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Create a task and return its id
    pub async fn create_task(&self, token: &str, title: &str) -> i64 {
        let response = self
            .post("/tasks")
            .bearer_auth(token)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing task id")
    }
}

/// User store with the same uniqueness rules as the `users` table
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let created = User {
            id: UserId(users.len() as i64 + 1),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.username == username).cloned())
    }
}

/// Task store applying the ownership filter and soft delete like the `tasks` table
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<(Task, bool)>>,
}

impl InMemoryTaskRepository {
    fn live<'a>(
        tasks: &'a mut [(Task, bool)],
        id: TaskId,
        owner: UserId,
    ) -> Option<&'a mut (Task, bool)> {
        tasks
            .iter_mut()
            .find(|(task, deleted)| task.id == id && task.owner_id == owner && !deleted)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.lock().unwrap();

        let created = Task {
            id: TaskId(tasks.len() as i64 + 1),
            owner_id: task.owner_id,
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: task.created_at,
            updated_at: task.created_at,
        };
        tasks.push((created.clone(), false));

        Ok(created)
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskError> {
        let tasks = self.tasks.lock().unwrap();

        Ok(tasks
            .iter()
            .filter(|(task, deleted)| task.owner_id == owner && !deleted)
            .map(|(task, _)| task.clone())
            .collect())
    }

    async fn update(
        &self,
        id: TaskId,
        owner: UserId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        let mut tasks = self.tasks.lock().unwrap();

        let (task, _) = Self::live(&mut tasks, id, owner).ok_or(TaskError::NotFound(id))?;
        command.apply_to(task);
        task.updated_at = chrono::Utc::now();

        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> Result<(), TaskError> {
        let mut tasks = self.tasks.lock().unwrap();

        let (_, deleted) = Self::live(&mut tasks, id, owner).ok_or(TaskError::NotFound(id))?;
        *deleted = true;

        Ok(())
    }
}

mod collection;

pub use collection::{Collection, Document};

// One file per collection under the data folder
pub const USERS_STORAGE_FILE: &str = "users.json";
pub const PROJECTS_STORAGE_FILE: &str = "projects.json";
pub const CONTACTS_STORAGE_FILE: &str = "contacts.json";

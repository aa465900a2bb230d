pub mod health;
pub mod machine_info;
pub mod metrics;
pub mod root;
pub mod todos;

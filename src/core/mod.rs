pub mod access;
pub mod approval;
pub mod router;
pub mod validator;

pub mod rounds;
pub mod tournaments;

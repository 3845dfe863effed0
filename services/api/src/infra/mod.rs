pub mod db;
pub mod images;
pub mod password;

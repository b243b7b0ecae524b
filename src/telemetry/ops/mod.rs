pub mod init;
pub mod add;
pub mod track;

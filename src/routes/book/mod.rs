mod handler;
mod model;

pub use handler::{create_book, delete_book, get_book, list_books, update_book};
pub use model::{Book, BookInput};

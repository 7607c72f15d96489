pub mod image_fetch;

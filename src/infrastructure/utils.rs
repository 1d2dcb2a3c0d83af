pub mod request_url;
pub mod valid_id;

pub mod prelude;

pub mod category;
pub mod category_translation;
pub mod content;
pub mod content_translation;
pub mod customer_detail;
pub mod landing_page;
pub mod pdf_download;
pub mod sea_orm_active_enums;
pub mod user;
pub mod user_token;
pub mod video_view;

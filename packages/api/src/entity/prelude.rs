pub use super::category::Entity as Category;
pub use super::category_translation::Entity as CategoryTranslation;
pub use super::content::Entity as Content;
pub use super::content_translation::Entity as ContentTranslation;
pub use super::customer_detail::Entity as CustomerDetail;
pub use super::landing_page::Entity as LandingPage;
pub use super::pdf_download::Entity as PdfDownload;
pub use super::user::Entity as User;
pub use super::user_token::Entity as UserToken;
pub use super::video_view::Entity as VideoView;

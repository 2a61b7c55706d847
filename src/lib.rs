//! Gemini image studio.
//!
//! Prompt enhancement, text-to-image generation and guided image editing
//! (clothing or background) through the Google Generative Language API.
//!
//! ```no_run
//! use genstudio::{Config, EditMode, ImagePayload, Studio};
//!
//! #[tokio::main]
//! async fn main() -> genstudio::Result<()> {
//!     let mut studio = Studio::from_config(Config::from_env())?;
//!     if !studio.restore()? {
//!         studio.save("my-api-key")?;
//!     }
//!
//!     let prompt = studio.gateway().enhance_prompt("a lion at sunset").await?;
//!     let image = studio.gateway().generate_image(&prompt).await?;
//!     image.save("lion.png")?;
//!
//!     let photo = ImagePayload::from_file("portrait.jpg")?;
//!     let edited = studio
//!         .gateway()
//!         .edit_image("a navy suit", &photo, EditMode::ChangeCloth)
//!         .await?;
//!     println!("{}", edited.to_data_uri());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod studio;
pub mod workbench;

pub use config::{Config, GeminiConfig};
pub use credential::{CredentialStore, FileStore, MemoryStore, API_KEY_SLOT};
pub use error::{Result, StudioError};
pub use gateway::ProviderGateway;
pub use gemini::{GeminiClient, GenerativeTransport, HttpTransport, ImageClient, TextClient};
pub use models::{EditMode, ImagePayload};
pub use studio::Studio;
pub use workbench::{Workbench, WorkbenchState};

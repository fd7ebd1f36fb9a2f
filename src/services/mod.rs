pub mod downloader;
pub mod housekeeping;
pub mod pipeline;

pub use downloader::LogoDownloader;
pub use housekeeping::{find_small_images, find_uncached, sync_index_from_storage, SmallImage};
pub use pipeline::LogoFetchPipeline;

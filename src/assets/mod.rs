//! Asset reading, parsing and asynchronous loading.

pub mod bundle;
pub mod io;
pub mod loaders;
pub mod server;

pub use bundle::{AssetBundle, BundleMaterial, BundleNode};
pub use io::{AssetReader, FileAssetReader, MemoryAssetReader};
pub use loaders::GltfLoader;
pub use server::{
    AssetKind, AudioBuffer, FontData, LoadEvent, LoadProgress, LoadedAsset, ResourceLoader,
};

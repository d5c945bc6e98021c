//! # pmotidal - Source Tidal pour PMOMusic : sous-système de cache
//!
//! Cette crate porte le cœur du greffon Tidal : les caches qui évitent de
//! solliciter le catalogue distant à chaque navigation. La traduction des
//! objets du catalogue vers le modèle du lecteur hôte, l'authentification et
//! le transport réseau vivent hors de cette crate et ne font qu'appeler les
//! caches à travers leur contrat get/insert/contains/prune.
//!
//! ## Architecture
//!
//! ```text
//! pmotidal
//!     ├── models.rs         - Objets du catalogue (artistes, albums, pistes,
//!     │                       playlists, résultats de recherche)
//!     ├── playlist_cache.rs - Caches de playlists avec contrôle de fraîcheur
//!     ├── search_cache.rs   - Mémoïsation des recherches
//!     ├── config.rs         - Configuration explicite des caches
//!     └── error.rs          - Erreurs du greffon
//!
//! pmoobjcache (générique)
//!     └── TieredCache       - Tier mémoire ordonné + artefacts JSON
//! ```
//!
//! ## Fraîcheur des playlists
//!
//! Le catalogue ne pousse aucune invalidation. Chaque listage expose un
//! horodatage `updated_at` par playlist ; une entrée en cache plus ancienne
//! que cet horodatage est traitée comme absente, ce qui force le chemin
//! read-through à recharger puis réécrire l'entrée en bloc.
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmotidal::TidalCacheConfig;
//!
//! # fn main() -> pmotidal::Result<()> {
//! let config = TidalCacheConfig::default();
//! let playlists = config.playlist_cache()?;
//!
//! if let Some(playlist) = playlists.get("tidal:playlist:0a1b2c") {
//!     println!("{} ({} pistes)", playlist.name, playlist.tracks.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod playlist_cache;
pub mod search_cache;

pub use config::TidalCacheConfig;
pub use error::{Result, TidalError};
pub use models::{Album, Artist, Playlist, RemotePlaylist, SearchResult, Track};
pub use playlist_cache::{
    canonical_key, PlaylistCache, PlaylistDiff, PlaylistMetadataCache, RemoteTimestamped,
};
pub use search_cache::{SearchCache, SearchKey};

//! # pmoobjcache - Cache d'objets à deux niveaux pour PMOMusic
//!
//! Cette crate fournit un cache générique d'objets sérialisables avec un tier
//! mémoire borné et un tier disque optionnel. Elle sert de base aux caches
//! spécialisés des sources de catalogue distantes, comme les caches de
//! playlists et de recherches de `pmotidal`.
//!
//! ## Vue d'ensemble
//!
//! `pmoobjcache` est optimisé pour des objets JSON issus d'une API, et non
//! pour des fichiers binaires téléchargés : chaque valeur vit en mémoire dans
//! une map ordonnée par insertion et, si la persistance est active, dans un
//! artefact JSON sur disque réutilisable d'un processus à l'autre.
//!
//! ## Architecture
//!
//! ```text
//! pmoobjcache
//!     ├── key.rs    - Codec de clés : validation, sharding, noms de fichiers
//!     ├── cache.rs  - TieredCache : mémoire ordonnée + artefacts JSON
//!     └── error.rs  - Taxonomie d'erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmoobjcache::TieredCache;
//!
//! # fn main() -> pmoobjcache::Result<()> {
//! // 1024 entrées résidentes au plus, artefacts persistés sous ./cache
//! let cache: TieredCache<String> = TieredCache::new(1024, true, "./cache")?;
//!
//! cache.insert("tidal:album:4321", "some value".to_string())?;
//! assert_eq!(cache.get("tidal:album:4321").as_deref(), Some("some value"));
//!
//! cache.prune("tidal:album:4321");
//! assert!(!cache.contains("tidal:album:4321"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Structure des fichiers
//!
//! Les artefacts sont shardés par type d'entité puis par préfixe
//! d'identifiant, afin de borner le nombre de fichiers par répertoire :
//!
//! ```text
//! cache/
//! ├── album/
//! │   └── 43/
//! │       └── tidal-album-4321.cache
//! └── playlist/
//!     └── 0a/
//!         └── tidal-playlist-0a1b2c.cache
//! ```
//!
//! ## Sémantique
//!
//! - L'éviction suit l'ordre d'insertion (FIFO), jamais la récence des accès,
//!   et ne touche que le tier mémoire.
//! - Une valeur « vide » (chaîne vide, `null`, collection vide) reste une
//!   entrée présente : la présence se lit sur l'`Option` retournée.
//! - Un artefact disque corrompu est supprimé et traité comme absent.
//!
//! ## Dépendances principales
//!
//! - `indexmap` : map ordonnée du tier mémoire
//! - `serde` / `serde_json` : format des artefacts
//! - `thiserror` : taxonomie d'erreurs
//! - `tracing` : journalisation des accès et récupérations
//!
//! ## Voir aussi
//!
//! - `pmotidal` : caches de playlists et de recherches bâtis sur cette crate

pub mod cache;
pub mod error;
pub mod key;

pub use cache::TieredCache;
pub use error::{CacheError, Result};

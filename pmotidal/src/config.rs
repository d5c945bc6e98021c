//! Configuration du sous-système de cache Tidal
//!
//! La configuration est une structure explicite passée aux constructeurs,
//! jamais un singleton de processus : l'hôte possède son propre système de
//! configuration et injecte la section qui concerne le greffon. La structure
//! se désérialise directement depuis cette section (champs absents remplacés
//! par les valeurs par défaut).

use crate::error::Result;
use crate::playlist_cache::{PlaylistCache, PlaylistMetadataCache};
use crate::search_cache::SearchCache;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Limite par défaut du tier mémoire des caches de playlists
const DEFAULT_MAX_SIZE: usize = 1024;

/// Limite par défaut du cache de recherches
const DEFAULT_SEARCH_MAX_SIZE: usize = 128;

/// Répertoire de cache par défaut
const DEFAULT_CACHE_DIR: &str = ".pmomusic/cache/tidal";

/// Sous-répertoire des playlists complètes
const PLAYLIST_DIR: &str = "playlist";

/// Sous-répertoire des listes allégées.
///
/// Distinct de [`PLAYLIST_DIR`] pour que les entrées d'en-tête n'écrasent
/// jamais le contenu complet d'un même identifiant.
const PLAYLIST_METADATA_DIR: &str = "playlist_metadata";

/// Sous-répertoire des résultats de recherche
const SEARCH_DIR: &str = "search";

/// Configuration des caches du greffon Tidal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TidalCacheConfig {
    /// Répertoire racine des artefacts persistés
    pub cache_dir: PathBuf,
    /// Limite du tier mémoire par cache de playlists (0 = illimité)
    pub max_size: usize,
    /// Limite dédiée du cache de recherches (0 = illimité)
    pub search_max_size: usize,
    /// Active la persistance sur disque
    pub persist: bool,
}

impl Default for TidalCacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            max_size: DEFAULT_MAX_SIZE,
            search_max_size: DEFAULT_SEARCH_MAX_SIZE,
            persist: true,
        }
    }
}

impl TidalCacheConfig {
    /// Construit le cache des playlists complètes.
    pub fn playlist_cache(&self) -> Result<PlaylistCache> {
        PlaylistCache::new(
            self.max_size,
            self.persist,
            self.cache_dir.join(PLAYLIST_DIR),
        )
    }

    /// Construit le cache des listes allégées.
    pub fn playlist_metadata_cache(&self) -> Result<PlaylistMetadataCache> {
        PlaylistMetadataCache::new(
            self.max_size,
            self.persist,
            self.cache_dir.join(PLAYLIST_METADATA_DIR),
        )
    }

    /// Construit le cache des recherches mémoïsées.
    pub fn search_cache(&self) -> Result<SearchCache> {
        SearchCache::new(
            self.search_max_size,
            self.persist,
            self.cache_dir.join(SEARCH_DIR),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TidalCacheConfig::default();
        assert_eq!(config.max_size, 1024);
        assert_eq!(config.search_max_size, 128);
        assert!(config.persist);
    }

    #[test]
    fn test_partial_deserialization() {
        // Les champs absents de la section de configuration prennent les
        // valeurs par défaut
        let config: TidalCacheConfig =
            serde_json::from_str(r#"{"max_size": 16, "persist": false}"#).unwrap();
        assert_eq!(config.max_size, 16);
        assert!(!config.persist);
        assert_eq!(config.search_max_size, 128);
    }
}

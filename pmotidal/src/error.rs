//! Gestion des erreurs pour la source Tidal

use thiserror::Error;

/// Type Result personnalisé pour pmotidal
pub type Result<T> = std::result::Result<T, TidalError>;

/// Erreurs possibles du greffon Tidal
#[derive(Error, Debug)]
pub enum TidalError {
    /// Erreur du sous-système de cache
    #[error("Cache error: {0}")]
    Cache(#[from] pmoobjcache::CacheError),

    /// Erreur remontée par un appel au catalogue distant
    ///
    /// Les appels réseau eux-mêmes vivent hors de cette crate ; leurs échecs
    /// transitent ici quand ils traversent le chemin read-through.
    #[error("Tidal API error: {0}")]
    Api(String),
}

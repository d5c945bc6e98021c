//! Types d'erreurs pour pmoobjcache

use thiserror::Error;

/// Type Result personnalisé pour pmoobjcache
pub type Result<T> = std::result::Result<T, CacheError>;

/// Erreurs possibles du cache à deux niveaux
///
/// Les absences normales ne sont jamais des erreurs : les lectures retournent
/// une `Option`. Un artefact disque illisible est récupéré en interne
/// (suppression puis absence signalée) et ne remonte jamais à l'appelant.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Clé malformée : moins de trois segments séparés par `:`
    #[error("Invalid cache key (expected at least 3 ':'-separated segments): {0}")]
    InvalidKey(String),

    /// Erreur d'entrée/sortie lors de la persistance
    ///
    /// Fatale pour une écriture : un cache qui prétend persister mais échoue
    /// en silence fausserait les relectures inter-processus.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Échec de sérialisation d'une valeur à persister
    #[error("Cache encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

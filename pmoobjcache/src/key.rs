//! Codec de clés de cache
//!
//! Une clé de cache est une chaîne opaque d'au moins trois segments séparés
//! par `:` : `<namespace>:<type>:<id>[...]`. La clé complète est l'identité
//! de l'entrée ; seuls le type d'entité et les deux premiers caractères de
//! l'identifiant servent au sharding sur disque, pour qu'aucun répertoire ne
//! finisse avec des dizaines de milliers de fichiers.
//!
//! Deux formats de noms de fichiers coexistent :
//! - canonique : la clé avec `:` remplacé par `-`, suffixée `.cache`
//! - hérité : la clé brute, deux-points compris
//!
//! Le format hérité reste accepté en lecture ; l'artefact est réécrit sous le
//! nom canonique au premier accès.

use crate::error::{CacheError, Result};
use std::path::{Path, PathBuf};

/// Extension des artefacts écrits sur disque
pub const CACHE_EXT: &str = "cache";

/// Nombre minimal de segments d'une clé valide
const MIN_SEGMENTS: usize = 3;

/// Longueur du préfixe d'identifiant utilisé pour le sharding
const SHARD_PREFIX_LEN: usize = 2;

/// Vérifie qu'une clé possède au moins trois segments.
pub fn validate(key: &str) -> Result<()> {
    if key.splitn(MIN_SEGMENTS, ':').count() < MIN_SEGMENTS {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Calcule les segments de sharding d'une clé.
///
/// Retourne `(type, préfixe)` où `préfixe` est constitué des deux premiers
/// caractères de l'identifiant (l'identifiant entier s'il est plus court).
///
/// # Errors
///
/// `CacheError::InvalidKey` si la clé compte moins de trois segments.
pub fn shard_path(key: &str) -> Result<(String, String)> {
    let mut segments = key.split(':');
    let _namespace = segments.next();
    match (segments.next(), segments.next()) {
        (Some(entity_type), Some(id)) => {
            let prefix: String = id.chars().take(SHARD_PREFIX_LEN).collect();
            Ok((entity_type.to_string(), prefix))
        }
        _ => Err(CacheError::InvalidKey(key.to_string())),
    }
}

/// Nom de fichier canonique d'une clé.
///
/// Les deux-points sont remplacés par des tirets pour rester lisibles par
/// tous les systèmes de fichiers.
pub fn file_name(key: &str) -> String {
    format!("{}.{}", key.replace(':', "-"), CACHE_EXT)
}

/// Nom de fichier hérité : la clé brute, deux-points compris.
pub fn legacy_file_name(key: &str) -> String {
    format!("{}.{}", key, CACHE_EXT)
}

/// Chemin canonique d'un artefact : `<base>/<type>/<préfixe>/<nom>`.
pub fn artifact_path(base: &Path, key: &str) -> Result<PathBuf> {
    let (entity_type, prefix) = shard_path(key)?;
    Ok(base.join(entity_type).join(prefix).join(file_name(key)))
}

/// Chemin hérité d'un artefact, dans le même répertoire de shard.
pub fn legacy_artifact_path(base: &Path, key: &str) -> Result<PathBuf> {
    let (entity_type, prefix) = shard_path(key)?;
    Ok(base.join(entity_type).join(prefix).join(legacy_file_name(key)))
}

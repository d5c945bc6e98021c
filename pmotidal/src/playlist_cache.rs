//! Caches de playlists sensibles à la fraîcheur amont
//!
//! Le catalogue distant ne pousse aucune invalidation : la seule information
//! de fraîcheur est l'horodatage `updated_at` observé lors d'un listage. Ce
//! module enveloppe [`TieredCache`] pour traiter une entrée plus ancienne que
//! cet horodatage comme absente, ce qui force le chemin read-through de
//! l'appelant à recharger puis réécrire la playlist en bloc.
//!
//! Deux caches coexistent :
//! - [`PlaylistCache`] conserve les playlists complètes
//! - [`PlaylistMetadataCache`] conserve les listes allégées (en-tête et
//!   nombre de pistes), sous un répertoire disque distinct pour ne jamais
//!   écraser le contenu complet d'un même identifiant

use crate::error::Result;
use crate::models::{Playlist, RemotePlaylist};
use chrono::{DateTime, Utc};
use pmoobjcache::TieredCache;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Préfixe canonique des clés de playlists
const KEY_PREFIX: &str = "tidal:playlist:";

/// Objet amont porteur d'un horodatage de dernière mise à jour
///
/// Implémenté par les types du catalogue qui savent dater leur dernier
/// changement ; c'est lui qui autorise le contrôle de fraîcheur de
/// [`PlaylistCache::get_fresh`].
pub trait RemoteTimestamped {
    /// Identifiant de la playlist côté catalogue
    fn id(&self) -> &str;
    /// Horodatage de dernière mise à jour observé côté catalogue
    fn updated_at(&self) -> DateTime<Utc>;
}

impl RemoteTimestamped for RemotePlaylist {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Ramène une clé quelconque (identifiant nu ou URI complète) à la forme
/// canonique `tidal:playlist:<id>`.
pub fn canonical_key(key_or_id: &str) -> String {
    if key_or_id.starts_with(KEY_PREFIX) {
        key_or_id.to_string()
    } else {
        format!("{KEY_PREFIX}{key_or_id}")
    }
}

/// Résultat d'une passe de réconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistDiff {
    /// Identifiants présents côté catalogue mais absents du cache
    pub added: Vec<String>,
    /// Identifiants disparus côté catalogue, purgés du cache
    pub removed: Vec<String>,
}

impl PlaylistDiff {
    /// Indique qu'aucune divergence n'a été constatée
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Cache de playlists complètes
pub struct PlaylistCache {
    cache: TieredCache<Playlist>,
}

impl PlaylistCache {
    /// Crée un cache de playlists complètes.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Limite du tier mémoire (0 = illimité)
    /// * `persist` - Active le tier disque
    /// * `base_dir` - Répertoire des artefacts de playlists complètes
    pub fn new<P: AsRef<Path>>(max_size: usize, persist: bool, base_dir: P) -> Result<Self> {
        Ok(Self {
            cache: TieredCache::new(max_size, persist, base_dir)?,
        })
    }

    /// Recherche par clé nue (identifiant ou URI).
    ///
    /// Aucune comparaison de fraîcheur n'est possible sur ce chemin : la
    /// valeur en cache est retournée telle quelle.
    pub fn get(&self, key_or_id: &str) -> Option<Playlist> {
        self.cache.get(&canonical_key(key_or_id))
    }

    /// Recherche pilotée par un objet amont.
    ///
    /// Si l'horodatage distant est strictement plus récent que l'entrée en
    /// cache, l'entrée est réputée absente même si elle existe physiquement,
    /// pour que l'appelant recharge depuis le catalogue.
    pub fn get_fresh<R: RemoteTimestamped>(&self, upstream: &R) -> Option<Playlist> {
        let cache_key = canonical_key(upstream.id());
        let cached = self.cache.get(&cache_key)?;
        if upstream.updated_at() > cached.last_modified {
            debug!(
                "Stale playlist entry {}: remote updated at {}, cached at {}",
                cache_key,
                upstream.updated_at(),
                cached.last_modified
            );
            return None;
        }
        Some(cached)
    }

    /// Insère ou remplace une playlist, clé dérivée de son URI.
    pub fn insert(&self, playlist: Playlist) -> Result<()> {
        let cache_key = canonical_key(&playlist.uri);
        self.cache.insert(&cache_key, playlist)?;
        Ok(())
    }

    /// Retire une playlist des deux tiers. Idempotent.
    pub fn prune(&self, key_or_id: &str) {
        self.cache.prune(&canonical_key(key_or_id));
    }

    /// Indique si une playlist est présente, sans contrôle de fraîcheur.
    pub fn contains(&self, key_or_id: &str) -> bool {
        self.cache.contains(&canonical_key(key_or_id))
    }

    /// Identifiants des playlists actuellement résidentes
    pub fn cached_ids(&self) -> BTreeSet<String> {
        cached_ids(&self.cache)
    }

    /// Chemin canonique de l'artefact d'une playlist
    pub fn artifact_path(&self, key_or_id: &str) -> Result<PathBuf> {
        Ok(self.cache.artifact_path(&canonical_key(key_or_id))?)
    }
}

/// Cache de métadonnées de playlists
///
/// Conserve les listes allégées servies par les listages : en-tête et nombre
/// de pistes, positions occupées par des pistes fictives. Les artefacts
/// vivent sous leur propre répertoire pour ne pas entrer en collision avec
/// les playlists complètes du même identifiant.
pub struct PlaylistMetadataCache {
    cache: TieredCache<Playlist>,
}

impl PlaylistMetadataCache {
    /// Crée un cache de métadonnées.
    ///
    /// `base_dir` doit être distinct du répertoire des playlists complètes ;
    /// c'est la configuration appelante qui garantit la séparation.
    pub fn new<P: AsRef<Path>>(max_size: usize, persist: bool, base_dir: P) -> Result<Self> {
        Ok(Self {
            cache: TieredCache::new(max_size, persist, base_dir)?,
        })
    }

    /// Recherche par clé nue, sans contrôle de fraîcheur.
    pub fn get(&self, key_or_id: &str) -> Option<Playlist> {
        self.cache.get(&canonical_key(key_or_id))
    }

    /// Recherche pilotée par un objet amont, mêmes règles que
    /// [`PlaylistCache::get_fresh`].
    pub fn get_fresh<R: RemoteTimestamped>(&self, upstream: &R) -> Option<Playlist> {
        let cache_key = canonical_key(upstream.id());
        let cached = self.cache.get(&cache_key)?;
        if upstream.updated_at() > cached.last_modified {
            debug!(
                "Stale playlist metadata {}: remote updated at {}, cached at {}",
                cache_key,
                upstream.updated_at(),
                cached.last_modified
            );
            return None;
        }
        Some(cached)
    }

    /// Insère la forme allégée d'une playlist.
    ///
    /// La conversion est systématique : même nourrie d'une playlist
    /// complète, l'entrée stockée ne garde que l'en-tête et le nombre de
    /// pistes.
    pub fn insert(&self, playlist: &Playlist) -> Result<()> {
        let cache_key = canonical_key(&playlist.uri);
        self.cache.insert(&cache_key, playlist.metadata_only())?;
        Ok(())
    }

    /// Insère l'entrée allégée correspondant à un listage distant.
    pub fn insert_remote(&self, remote: &RemotePlaylist) -> Result<()> {
        let playlist = Playlist::from_remote_listing(remote);
        let cache_key = canonical_key(&playlist.uri);
        self.cache.insert(&cache_key, playlist)?;
        Ok(())
    }

    /// Retire une entrée des deux tiers. Idempotent.
    pub fn prune(&self, key_or_id: &str) {
        self.cache.prune(&canonical_key(key_or_id));
    }

    /// Identifiants des entrées actuellement résidentes
    pub fn cached_ids(&self) -> BTreeSet<String> {
        cached_ids(&self.cache)
    }

    /// Chemin canonique de l'artefact d'une entrée
    pub fn artifact_path(&self, key_or_id: &str) -> Result<PathBuf> {
        Ok(self.cache.artifact_path(&canonical_key(key_or_id))?)
    }

    /// Réconcilie le cache avec l'ensemble complet des identifiants distants.
    ///
    /// Calcule la différence d'ensembles entre les identifiants observés côté
    /// catalogue et ceux en cache : les disparus sont purgés, les nouveaux
    /// sont signalés à l'appelant, qui décide de les charger. La passe est
    /// idempotente, peut être rejouée sans risque et ne rafraîchit aucun
    /// contenu de playlist.
    pub fn reconcile<I, S>(&self, remote_ids: I) -> PlaylistDiff
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let remote: BTreeSet<String> = remote_ids.into_iter().map(Into::into).collect();
        let cached = self.cached_ids();

        let added: Vec<String> = remote.difference(&cached).cloned().collect();
        let removed: Vec<String> = cached.difference(&remote).cloned().collect();
        for id in &removed {
            self.cache.prune(&canonical_key(id));
        }

        if !added.is_empty() || !removed.is_empty() {
            debug!(
                "Playlist reconciliation: {} added, {} removed",
                added.len(),
                removed.len()
            );
        }
        PlaylistDiff { added, removed }
    }
}

/// Identifiants extraits des clés résidentes d'un cache de playlists
fn cached_ids(cache: &TieredCache<Playlist>) -> BTreeSet<String> {
    cache
        .resident_keys()
        .iter()
        .filter_map(|cache_key| cache_key.strip_prefix(KEY_PREFIX))
        .map(String::from)
        .collect()
}

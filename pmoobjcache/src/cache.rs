//! Cache d'objets à deux niveaux : mémoire ordonnée et artefacts JSON
//!
//! Le tier mémoire est une map ordonnée par insertion, bornée par un nombre
//! d'entrées. Le tier disque, optionnel, conserve chaque valeur sous forme
//! d'un artefact JSON dans une arborescence shardée (voir [`crate::key`]).
//!
//! Sémantique d'éviction : quand la limite est dépassée, les entrées les plus
//! anciennement insérées quittent la mémoire, dans l'ordre d'insertion et non
//! selon la récence des accès. Une lecture ne réordonne rien. Les artefacts
//! disque des entrées évincées restent en place : le tier disque est le
//! niveau durable, partagé entre processus, et [`TieredCache::prune`] en est
//! la voie de récupération explicite.

use crate::error::Result;
use crate::key;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Cache générique à deux niveaux
///
/// Toutes les opérations prennent `&self` : l'état interne est protégé par un
/// mutex qui couvre la map mémoire et le chemin d'écriture disque, pour que
/// des appels concurrents (pool de téléchargements, rafraîchissements par
/// page) restent sûrs sans synchronisation externe.
///
/// # Paramètres de type
///
/// * `T` - Type des valeurs en cache, sérialisable en JSON
pub struct TieredCache<T> {
    /// Tier mémoire, ordonné par insertion
    entries: Mutex<IndexMap<String, T>>,
    /// Nombre maximal d'entrées résidentes (0 = illimité)
    max_size: usize,
    /// Persistance sur disque activée
    persist: bool,
    /// Répertoire racine des artefacts
    base_dir: PathBuf,
}

impl<T> TieredCache<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Crée un nouveau cache.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Limite du tier mémoire en nombre d'entrées (0 = illimité)
    /// * `persist` - Active le tier disque
    /// * `base_dir` - Répertoire racine des artefacts, créé si absent quand
    ///   la persistance est active (ignoré sinon)
    pub fn new<P: AsRef<Path>>(max_size: usize, persist: bool, base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        if persist && !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
            info!("Created cache directory: {}", base_dir.display());
        }

        Ok(Self {
            entries: Mutex::new(IndexMap::new()),
            max_size,
            persist,
            base_dir,
        })
    }

    /// Limite du tier mémoire (0 = illimité)
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Indique si le tier disque est actif
    pub fn persist(&self) -> bool {
        self.persist
    }

    /// Répertoire racine des artefacts
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Nombre d'entrées résidentes en mémoire
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Indique si le tier mémoire est vide
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clés résidentes en mémoire, dans l'ordre d'insertion
    pub fn resident_keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Chemin canonique de l'artefact d'une clé
    pub fn artifact_path(&self, cache_key: &str) -> Result<PathBuf> {
        key::artifact_path(&self.base_dir, cache_key)
    }

    /// Recherche une valeur.
    ///
    /// Le tier mémoire est consulté d'abord, sans réordonnancement. Sur
    /// absence et si la persistance est active, l'artefact disque est chargé
    /// et repeuple la mémoire sans réécrire le disque. Un artefact illisible
    /// est supprimé et l'appel signale une absence : un échec de décodage ne
    /// remonte jamais à l'appelant.
    pub fn get(&self, cache_key: &str) -> Option<T> {
        let mut entries = self.lock();
        if let Some(value) = entries.get(cache_key) {
            debug!("Cache hit (memory): {}", cache_key);
            return Some(value.clone());
        }

        if self.persist {
            if let Some(value) = self.load_artifact(cache_key) {
                debug!("Cache hit (disk): {}", cache_key);
                entries.insert(cache_key.to_string(), value.clone());
                Self::evict(&mut entries, self.max_size);
                return Some(value);
            }
        }

        debug!("Cache miss: {}", cache_key);
        None
    }

    /// Indique si une clé est présente.
    ///
    /// La présence se juge sur l'`Option` retournée par [`TieredCache::get`],
    /// jamais sur la valeur : une valeur « vide » stockée sous une clé reste
    /// présente.
    pub fn contains(&self, cache_key: &str) -> bool {
        self.get(cache_key).is_some()
    }

    /// Insère ou remplace une valeur.
    ///
    /// La clé est validée, puis la valeur est écrite sur disque de façon
    /// synchrone (quand la persistance est active) avant de remplacer
    /// l'entrée mémoire. Une clé réécrite redevient l'entrée la plus récente.
    /// L'éviction est appliquée après l'écriture.
    ///
    /// # Errors
    ///
    /// `CacheError::InvalidKey` pour une clé malformée, `CacheError::Io` ou
    /// `CacheError::Encode` si la persistance échoue. Dans ce dernier cas le
    /// tier mémoire n'est pas modifié.
    pub fn insert(&self, cache_key: &str, value: T) -> Result<()> {
        key::validate(cache_key)?;
        let mut entries = self.lock();
        self.store(&mut entries, cache_key, value)?;
        Self::evict(&mut entries, self.max_size);
        Ok(())
    }

    /// Insertion en masse : toutes les entrées sont écrites, puis une seule
    /// passe d'éviction est appliquée.
    pub fn update<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let mut entries = self.lock();
        for (cache_key, value) in items {
            key::validate(&cache_key)?;
            self.store(&mut entries, &cache_key, value)?;
        }
        Self::evict(&mut entries, self.max_size);
        Ok(())
    }

    /// Retire une clé des deux tiers.
    ///
    /// L'absence de l'entrée ou de son artefact n'est pas une erreur :
    /// l'opération est idempotente.
    pub fn prune(&self, cache_key: &str) {
        let mut entries = self.lock();
        self.remove(&mut entries, cache_key);
    }

    /// Applique [`TieredCache::prune`] à toutes les clés résidentes.
    pub fn prune_all(&self) {
        let mut entries = self.lock();
        let keys: Vec<String> = entries.keys().cloned().collect();
        for cache_key in keys {
            self.remove(&mut entries, &cache_key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, T>> {
        // La map reste structurellement valide même si un thread a paniqué en
        // détenant le verrou : on absorbe l'empoisonnement.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Écrit une entrée dans les deux tiers, disque d'abord.
    fn store(&self, entries: &mut IndexMap<String, T>, cache_key: &str, value: T) -> Result<()> {
        if self.persist {
            let path = key::artifact_path(&self.base_dir, cache_key)?;
            self.write_artifact(&path, &value)?;
        }
        // Une clé réécrite est déplacée en fin d'ordre d'insertion.
        entries.shift_remove(cache_key);
        entries.insert(cache_key.to_string(), value);
        Ok(())
    }

    fn remove(&self, entries: &mut IndexMap<String, T>, cache_key: &str) {
        entries.shift_remove(cache_key);
        if !self.persist {
            return;
        }
        let paths = [
            key::artifact_path(&self.base_dir, cache_key),
            key::legacy_artifact_path(&self.base_dir, cache_key),
        ];
        for path in paths.into_iter().flatten() {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed cache artifact {}", path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!("Failed to remove cache artifact {}: {}", path.display(), err)
                }
            }
        }
    }

    /// Éviction FIFO : retire les entrées les plus anciennement insérées du
    /// tier mémoire tant que la limite est dépassée. Le tier disque n'est pas
    /// touché.
    fn evict(entries: &mut IndexMap<String, T>, max_size: usize) {
        if max_size == 0 {
            return;
        }
        while entries.len() > max_size {
            if let Some((cache_key, _)) = entries.shift_remove_index(0) {
                debug!("Evicted oldest cache entry: {}", cache_key);
            }
        }
    }

    /// Charge l'artefact d'une clé, format canonique puis format hérité.
    fn load_artifact(&self, cache_key: &str) -> Option<T> {
        let path = match key::artifact_path(&self.base_dir, cache_key) {
            Ok(path) => path,
            Err(err) => {
                warn!("Rejected cache lookup: {}", err);
                return None;
            }
        };
        if let Some(value) = self.read_artifact(&path) {
            return Some(value);
        }

        // Ancien format de nom de fichier : clé brute avec deux-points. On
        // migre l'artefact vers le nom canonique au premier accès.
        let legacy = key::legacy_artifact_path(&self.base_dir, cache_key).ok()?;
        let value = self.read_artifact(&legacy)?;
        match self.write_artifact(&path, &value) {
            Ok(()) => {
                let _ = fs::remove_file(&legacy);
                debug!(
                    "Migrated legacy cache artifact {} -> {}",
                    legacy.display(),
                    path.display()
                );
            }
            Err(err) => warn!(
                "Failed to migrate legacy cache artifact {}: {}",
                legacy.display(),
                err
            ),
        }
        Some(value)
    }

    /// Lit et décode un artefact. Un fichier absent est une absence normale,
    /// un fichier illisible est supprimé puis signalé absent.
    fn read_artifact(&self, path: &Path) -> Option<T> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read cache artifact {}: {}", path.display(), err);
                }
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Corrupt cache artifact {}: {}", path.display(), err);
                let _ = fs::remove_file(path);
                None
            }
        }
    }

    /// Sérialise et écrit un artefact.
    ///
    /// L'écriture passe par un fichier temporaire renommé ensuite : un
    /// lecteur concurrent ne voit jamais d'artefact partiel, et la dernière
    /// écriture gagne.
    fn write_artifact(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        debug!("Saved cache artifact to {}", path.display());
        Ok(())
    }
}

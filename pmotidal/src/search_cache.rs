//! Mémoïsation des appels de recherche
//!
//! Une recherche auprès du catalogue est coûteuse (plusieurs requêtes
//! paginées par type d'entité) : son résultat complet est mémoïsé sous une
//! clé stable dérivée de la requête normalisée. Deux requêtes équivalentes à
//! l'ordre des champs près partagent la même entrée ; le drapeau `exact`
//! fait partie de l'identité.

use crate::error::Result;
use crate::models::SearchResult;
use pmoobjcache::TieredCache;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Espace de clés des recherches mémoïsées
const KEY_PREFIX: &str = "tidal:search:";

/// Champs de requête que le catalogue distant ne sait pas honorer.
///
/// Ils varient d'un appel à l'autre sans changer le contrat de recherche
/// (ex. un filtre de numéro de piste) et sont retirés avant le calcul de la
/// clé pour ne pas provoquer de faux défauts de cache.
const VOLATILE_FIELDS: &[&str] = &["track_no"];

/// Clé stable d'une recherche normalisée
///
/// La normalisation trie les champs par nom et retire les champs volatils :
/// deux requêtes dont les champs ne diffèrent que par l'ordre sont égales et
/// partagent le même hash ; deux requêtes ne différant que par `exact` sont
/// distinctes. Un champ dupliqué n'est conservé qu'une fois.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    exact: bool,
    query: Vec<(String, String)>,
}

impl SearchKey {
    /// Construit une clé depuis le drapeau `exact` et les champs de requête.
    pub fn new<I, K, V>(exact: bool, query: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query: Vec<(String, String)> = query
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .filter(|(field, _)| !VOLATILE_FIELDS.contains(&field.as_str()))
            .collect();
        query.sort();
        query.dedup_by(|a, b| a.0 == b.0);
        Self { exact, query }
    }

    /// Drapeau de recherche exacte
    pub fn exact(&self) -> bool {
        self.exact
    }

    /// Champs normalisés de la requête
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Condensé SHA1 de la forme canonique, en hexadécimal.
    ///
    /// Les champs sont séparés par un octet nul pour que des concaténations
    /// différentes ne produisent jamais le même condensé.
    fn digest(&self) -> String {
        use sha1::{Digest, Sha1};
        let mut hasher = Sha1::new();
        hasher.update([self.exact as u8]);
        for (field, value) in &self.query {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for SearchKey {
    /// Rend la clé de cache complète : `tidal:search:<condensé>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}{}", self.digest())
    }
}

/// Cache mémoïsant les appels de recherche
pub struct SearchCache {
    cache: TieredCache<SearchResult>,
}

impl SearchCache {
    /// Crée un cache de recherches.
    pub fn new<P: AsRef<Path>>(max_size: usize, persist: bool, base_dir: P) -> Result<Self> {
        Ok(Self {
            cache: TieredCache::new(max_size, persist, base_dir)?,
        })
    }

    /// Retourne le résultat mémoïsé, ou invoque `fetch` puis mémorise.
    ///
    /// Sur présence, `fetch` n'est pas invoqué. Sur absence, son résultat est
    /// stocké sous la clé normalisée puis retourné. Un échec de `fetch`
    /// remonte tel quel et ne mémorise rien : l'appel suivant retentera.
    pub fn get_or_fetch<F>(&self, search_key: &SearchKey, fetch: F) -> Result<SearchResult>
    where
        F: FnOnce() -> Result<SearchResult>,
    {
        let cache_key = search_key.to_string();
        if let Some(result) = self.cache.get(&cache_key) {
            debug!("Search cache hit: {}", cache_key);
            return Ok(result);
        }

        debug!("Search cache miss: {}", cache_key);
        let result = fetch()?;
        self.cache.insert(&cache_key, result.clone())?;
        Ok(result)
    }

    /// Indique si une recherche est déjà mémoïsée.
    pub fn contains(&self, search_key: &SearchKey) -> bool {
        self.cache.contains(&search_key.to_string())
    }

    /// Retire une recherche mémoïsée. Idempotent.
    pub fn prune(&self, search_key: &SearchKey) {
        self.cache.prune(&search_key.to_string());
    }

    /// Vide entièrement le cache de recherches.
    pub fn prune_all(&self) {
        self.cache.prune_all();
    }
}

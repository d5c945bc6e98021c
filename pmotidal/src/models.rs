//! Structures de données pour représenter les objets du catalogue Tidal
//!
//! Seule la surface dont les caches ont besoin est représentée ici : les
//! traductions complètes vers le modèle du lecteur hôte vivent ailleurs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Représente un artiste Tidal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    /// Identifiant unique de l'artiste
    pub id: String,
    /// Nom de l'artiste
    pub name: String,
}

/// Représente un album Tidal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    /// Identifiant unique de l'album
    pub id: String,
    /// Titre de l'album
    pub title: String,
    /// Artiste principal de l'album
    pub artist: Option<Artist>,
}

/// Représente une piste Tidal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// URI de la piste (`tidal:track:<id>`)
    pub uri: String,
    /// Titre de la piste
    pub name: String,
    /// Artiste de la piste
    #[serde(default)]
    pub artist: Option<Artist>,
    /// Album d'origine
    #[serde(default)]
    pub album: Option<Album>,
    /// Numéro de piste dans l'album
    #[serde(default)]
    pub track_no: Option<u32>,
}

impl Track {
    /// Piste fictive utilisée par les listes allégées.
    ///
    /// Le cache de métadonnées ne conserve d'une playlist que son en-tête et
    /// son nombre de pistes : chaque position est occupée par une fictive.
    pub fn placeholder(index: u32) -> Self {
        Self {
            uri: format!("tidal:track:placeholder:{index}"),
            name: String::new(),
            artist: None,
            album: None,
            track_no: None,
        }
    }
}

/// Une playlist telle que conservée par le cache
///
/// L'entrée est toujours remplacée en bloc, jamais retouchée : un
/// rafraîchissement réussi écrase la valeur complète.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    /// URI de la playlist (`tidal:playlist:<id>`)
    pub uri: String,
    /// Nom de la playlist
    pub name: String,
    /// Pistes de la playlist
    pub tracks: Vec<Track>,
    /// Horodatage de dernière modification connue
    pub last_modified: DateTime<Utc>,
}

impl Playlist {
    /// Identifiant extrait de l'URI
    pub fn id(&self) -> &str {
        self.uri.rsplit(':').next().unwrap_or(&self.uri)
    }

    /// Variante allégée : mêmes en-têtes, pistes remplacées par des fictives
    /// pour ne conserver que leur nombre.
    pub fn metadata_only(&self) -> Self {
        Self {
            uri: self.uri.clone(),
            name: self.name.clone(),
            tracks: (0..self.tracks.len() as u32).map(Track::placeholder).collect(),
            last_modified: self.last_modified,
        }
    }

    /// Entrée allégée construite depuis un listage du catalogue.
    ///
    /// Un listage ne fournit que l'en-tête et le nombre de pistes annoncé ;
    /// le contenu complet n'est chargé que sur demande.
    pub fn from_remote_listing(remote: &RemotePlaylist) -> Self {
        Self {
            uri: format!("tidal:playlist:{}", remote.id),
            name: remote.title.clone(),
            tracks: (0..remote.num_tracks).map(Track::placeholder).collect(),
            last_modified: remote.updated_at,
        }
    }
}

/// Playlist telle qu'exposée par le catalogue distant
///
/// Le catalogue ne pousse aucune invalidation : `updated_at`, observé à
/// chaque listage, est la seule information de fraîcheur disponible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePlaylist {
    /// Identifiant de la playlist côté catalogue
    pub id: String,
    /// Titre de la playlist
    pub title: String,
    /// Horodatage de dernière mise à jour côté serveur
    pub updated_at: DateTime<Utc>,
    /// Nombre de pistes annoncé
    pub num_tracks: u32,
}

/// Résultat complet d'une recherche
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Artistes trouvés
    pub artists: Vec<Artist>,
    /// Albums trouvés
    pub albums: Vec<Album>,
    /// Pistes trouvées
    pub tracks: Vec<Track>,
}

use chrono::{DateTime, Utc};
use pmotidal::{
    canonical_key, Playlist, PlaylistCache, PlaylistMetadataCache, RemotePlaylist, Track,
};
use tempfile::TempDir;

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn playlist(id: &str, last_modified: i64) -> Playlist {
    Playlist {
        uri: format!("tidal:playlist:{id}"),
        name: format!("Playlist {id}"),
        tracks: vec![Track {
            uri: format!("tidal:track:{id}-1"),
            name: "Track".to_string(),
            artist: None,
            album: None,
            track_no: Some(1),
        }],
        last_modified: ts(last_modified),
    }
}

fn remote(id: &str, updated_at: i64) -> RemotePlaylist {
    RemotePlaylist {
        id: id.to_string(),
        title: format!("Playlist {id}"),
        updated_at: ts(updated_at),
        num_tracks: 1,
    }
}

fn memory_cache() -> PlaylistCache {
    PlaylistCache::new(8, false, "unused").unwrap()
}

#[test]
fn test_canonical_key() {
    assert_eq!(canonical_key("0-1-2"), "tidal:playlist:0-1-2");
    assert_eq!(canonical_key("tidal:playlist:0-1-2"), "tidal:playlist:0-1-2");
}

#[test]
fn test_cached_as_str() {
    // Une clé nue et l'URI complète désignent la même entrée
    let cache = memory_cache();
    cache.insert(playlist("0-1-2", 10)).unwrap();

    assert!(cache.get("tidal:playlist:0-1-2").is_some());
    assert_eq!(
        cache.get("0-1-2").unwrap().uri,
        "tidal:playlist:0-1-2"
    );
}

#[test]
fn test_not_updated() {
    // Horodatage distant égal : l'entrée en cache reste servie
    let cache = memory_cache();
    cache.insert(playlist("0-1-2", 10)).unwrap();

    let upstream = remote("0-1-2", 10);
    assert!(cache.get_fresh(&upstream).is_some());
}

#[test]
fn test_updated() {
    // Horodatage distant strictement plus récent : absence signalée pour
    // forcer le rechargement read-through
    let cache = memory_cache();
    cache.insert(playlist("0-1-2", 9)).unwrap();

    let upstream = remote("0-1-2", 10);
    assert!(cache.get_fresh(&upstream).is_none());

    // L'entrée existe toujours physiquement pour le chemin sans comparateur
    assert!(cache.get("0-1-2").is_some());
}

#[test]
fn test_older_upstream_is_served() {
    let cache = memory_cache();
    cache.insert(playlist("0-1-2", 10)).unwrap();

    let upstream = remote("0-1-2", 9);
    assert!(cache.get_fresh(&upstream).is_some());
}

#[test]
fn test_refetch_overwrites_wholesale() {
    let cache = memory_cache();
    cache.insert(playlist("0-1-2", 9)).unwrap();

    let upstream = remote("0-1-2", 10);
    assert!(cache.get_fresh(&upstream).is_none());

    // Le rechargement réécrit l'entrée en bloc ; elle redevient fraîche
    let mut refreshed = playlist("0-1-2", 10);
    refreshed.name = "Refreshed".to_string();
    cache.insert(refreshed).unwrap();

    let cached = cache.get_fresh(&upstream).unwrap();
    assert_eq!(cached.name, "Refreshed");
    assert_eq!(cached.last_modified, ts(10));
}

#[test]
fn test_metadata_cache_writes_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let cache = PlaylistMetadataCache::new(8, true, temp_dir.path()).unwrap();

    let path = cache.artifact_path("tidal:playlist:00-1-2").unwrap();
    assert!(!path.exists());

    cache.insert_remote(&remote("00-1-2", 10)).unwrap();
    assert!(path.exists());
    assert!(cache.get("tidal:playlist:00-1-2").is_some());
}

#[test]
fn test_metadata_keeps_only_track_count() {
    let cache = PlaylistMetadataCache::new(8, false, "unused").unwrap();
    let mut full = playlist("0-1-2", 10);
    full.tracks.push(Track {
        uri: "tidal:track:0-1-2-2".to_string(),
        name: "Other".to_string(),
        artist: None,
        album: None,
        track_no: Some(2),
    });

    cache.insert(&full).unwrap();
    let cached = cache.get("0-1-2").unwrap();
    assert_eq!(cached.tracks.len(), full.tracks.len());
    // Les positions sont des pistes fictives, le contenu réel n'est pas copié
    assert!(cached.tracks.iter().all(|t| t.name.is_empty()));
}

#[test]
fn test_metadata_and_full_do_not_collide() {
    // Les listes allégées vivent sous leur propre répertoire : elles
    // n'écrasent jamais le contenu complet du même identifiant
    let temp_dir = TempDir::new().unwrap();
    let full_cache = PlaylistCache::new(8, true, temp_dir.path().join("playlist")).unwrap();
    let meta_cache =
        PlaylistMetadataCache::new(8, true, temp_dir.path().join("playlist_metadata")).unwrap();

    full_cache.insert(playlist("0-1-2", 10)).unwrap();
    meta_cache.insert_remote(&remote("0-1-2", 10)).unwrap();

    let full_path = full_cache.artifact_path("0-1-2").unwrap();
    let meta_path = meta_cache.artifact_path("0-1-2").unwrap();
    assert_ne!(full_path, meta_path);
    assert!(full_path.exists());
    assert!(meta_path.exists());

    // Le contenu complet est intact
    let cached = full_cache.get("0-1-2").unwrap();
    assert_eq!(cached.tracks[0].name, "Track");
}

#[test]
fn test_reconcile() {
    let cache = PlaylistMetadataCache::new(8, false, "unused").unwrap();
    for id in ["a1", "b2", "c3"] {
        cache.insert_remote(&remote(id, 10)).unwrap();
    }

    // b2 et c3 persistent, a1 a disparu du catalogue, d4 est apparu
    let diff = cache.reconcile(["b2", "c3", "d4"]);
    assert_eq!(diff.added, vec!["d4".to_string()]);
    assert_eq!(diff.removed, vec!["a1".to_string()]);

    assert!(cache.get("a1").is_none());
    assert!(cache.get("b2").is_some());
    assert!(cache.get("c3").is_some());
}

#[test]
fn test_reconcile_is_idempotent() {
    let cache = PlaylistMetadataCache::new(8, false, "unused").unwrap();
    for id in ["a1", "b2"] {
        cache.insert_remote(&remote(id, 10)).unwrap();
    }

    let first = cache.reconcile(["b2"]);
    assert_eq!(first.removed, vec!["a1".to_string()]);

    // Rejouer la passe ne retire plus rien et ne signale plus de disparus
    let second = cache.reconcile(["b2"]);
    assert!(second.removed.is_empty());
    assert!(second.added.is_empty());
    assert!(second.is_empty());
}

#[test]
fn test_reconcile_prunes_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let cache = PlaylistMetadataCache::new(8, true, temp_dir.path()).unwrap();
    cache.insert_remote(&remote("a1", 10)).unwrap();
    let path = cache.artifact_path("a1").unwrap();
    assert!(path.exists());

    cache.reconcile(Vec::<String>::new());
    assert!(!path.exists());
    assert!(cache.get("a1").is_none());
}

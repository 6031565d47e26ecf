mod helpers;

use std::sync::Arc;

use chrono::Utc;
use helpers::{knowledge_base, letter_vector, ScriptedEmbedder};
use recollect::knowledge::scope::{PartitionFilter, ProjectSelector};
use recollect::knowledge::store::NewRecord;
use recollect::knowledge::types::{EntityType, KnowledgeRecord, Scope};
use recollect::vector::sqlite::SqliteVectorStore;
use recollect::vector::VectorStore;

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.db");

    let written = {
        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::open(&path).unwrap());
        let kb = knowledge_base(store, ScriptedEmbedder::new());
        let mut ids = Vec::new();
        for (text, scope) in [
            ("first local", Scope::Local),
            ("then global", Scope::Global),
            ("kept private", Scope::Private),
        ] {
            let r = kb
                .store(NewRecord::new(text, "A", scope, EntityType::Fact).with_session("s1"))
                .await
                .unwrap();
            ids.push(r.id);
        }
        ids
    };

    let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::open(&path).unwrap());
    assert_eq!(store.count().unwrap(), 3);

    let all = store.get(&PartitionFilter::all()).unwrap();
    let ids: Vec<String> = all.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, written);
    assert!(all.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert!(all.iter().all(|r| r.source_session.as_deref() == Some("s1")));

    let kb = knowledge_base(store, ScriptedEmbedder::new());
    let hits = kb
        .search("first local", &ProjectSelector::Project("A".into()), 5)
        .await
        .unwrap();
    assert_eq!(hits[0].record.id, written[0]);
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn reopened_store_stamps_after_newest_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.db");

    // Written by a process whose clock ran a day ahead.
    let ahead = Utc::now() + chrono::Duration::days(1);
    {
        let store = SqliteVectorStore::open(&path).unwrap();
        store
            .add(&KnowledgeRecord {
                id: "from-the-future".into(),
                content: "clock skew".into(),
                embedding: letter_vector("clock skew"),
                project_id: "A".into(),
                scope: Scope::Global,
                entity_type: EntityType::Fact,
                source_session: None,
                timestamp: ahead,
                manual_save: false,
            })
            .unwrap();
    }

    let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::open(&path).unwrap());
    let kb = knowledge_base(store.clone(), ScriptedEmbedder::new());
    for i in 0..3 {
        kb.store(NewRecord::new(format!("after reopen {i}"), "A", Scope::Global, EntityType::Fact))
            .await
            .unwrap();
    }

    let all = store.get(&PartitionFilter::global()).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].id, "from-the-future");
    assert!(all.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

use course_planner::models::Course;
use course_planner::persistence::{SchedulePersistence, SCHEDULE_KEY};
use course_planner::schedule::ScheduleStore;
use course_planner::storage::{KeyValueStore, MemoryStore, SqliteStore};
use speculate2::speculate;

fn course(id: &str, credits: u32) -> Course {
    Course {
        id: id.to_string(),
        department: "CS".to_string(),
        course_code: format!("CS {}", id),
        title: format!("Course {}", id),
        description: String::new(),
        credits,
        level: "Graduate".to_string(),
        terms: vec!["Summer".to_string()],
        prerequisites: vec!["CS 100".to_string()],
    }
}

fn open_sqlite(path: std::path::PathBuf) -> SqliteStore {
    let store = SqliteStore::open(path).expect("Failed to open store");
    store.migrate().expect("Failed to migrate");
    store
}

speculate! {
    describe "memory store" {
        before {
            let store = MemoryStore::new();
        }

        it "returns None for a missing key" {
            assert_eq!(store.get("missing").unwrap(), None);
        }

        it "overwrites on set" {
            store.set("k", "one").unwrap();
            store.set("k", "two").unwrap();
            assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
            assert_eq!(store.len(), 1);
        }

        it "removes keys and tolerates missing ones" {
            store.set("k", "v").unwrap();
            store.remove("k").unwrap();
            store.remove("k").unwrap();
            assert!(store.is_empty());
        }

        it "shares entries between clones" {
            let other = store.clone();
            store.set("k", "v").unwrap();
            assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        }
    }

    describe "sqlite store" {
        before {
            let store = SqliteStore::open_memory().expect("Failed to open in-memory store");
            store.migrate().expect("Failed to migrate");
        }

        it "returns None for a missing key" {
            assert_eq!(store.get("missing").unwrap(), None);
        }

        it "overwrites on set" {
            store.set("k", "one").unwrap();
            store.set("k", "two").unwrap();
            assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        }

        it "removes keys" {
            store.set("k", "v").unwrap();
            store.remove("k").unwrap();
            assert_eq!(store.get("k").unwrap(), None);
        }

        it "can be migrated twice" {
            store.migrate().expect("second migration failed");
        }

        it "keeps values across reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("schedule.db");

            {
                let store = open_sqlite(path.clone());
                let mut schedule = ScheduleStore::open(SchedulePersistence::new(store));
                schedule.add(&course("b", 4)).unwrap();
                schedule.add(&course("a", 3)).unwrap();
            }

            let schedule = ScheduleStore::open(SchedulePersistence::new(open_sqlite(path)));
            let ids: Vec<_> = schedule.courses().iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["b", "a"]);
            assert_eq!(schedule.total_credits(), 7);
            assert_eq!(schedule.courses()[0].prerequisites, vec!["CS 100".to_string()]);
        }
    }

    describe "schedule persistence" {
        before {
            let store = MemoryStore::new();
            let persistence = SchedulePersistence::new(store.clone());
        }

        it "writes full course records under the schedule key" {
            persistence.save(&[course("a", 3)]).unwrap();
            let raw = store.get(SCHEDULE_KEY).unwrap().unwrap();
            let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(value[0]["id"], "a");
            assert_eq!(value[0]["courseCode"], "CS a");
            assert_eq!(value[0]["credits"], 3);
            assert_eq!(value[0]["terms"][0], "Summer");
        }

        it "loads nothing from a missing key" {
            assert!(persistence.load().is_empty());
        }

        it "treats a non-list value as no saved schedule" {
            store.set(SCHEDULE_KEY, r#"{"courses": []}"#).unwrap();
            assert!(persistence.load().is_empty());
        }

        it "does not recover part of a corrupted list" {
            store.set(SCHEDULE_KEY, r#"[{"id": "a", "department": "CS", "courseCode": "CS a", "title": "A", "credits": 3}, {"id": 7}]"#).unwrap();
            assert!(persistence.load().is_empty());
        }
    }
}

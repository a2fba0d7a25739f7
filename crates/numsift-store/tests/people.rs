use numsift_core::MobileNumber;
use numsift_store::Store;

fn mobile(raw: &str) -> MobileNumber {
    raw.parse().expect("valid mobile")
}

#[test]
fn record_upserts_on_phone_and_city() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let now = 1_700_000_000;
    let city = store.cities().get_or_create(now, "Mumbai").expect("city");
    let phone = mobile("9867550819");

    let (person, created) = store
        .people()
        .record(now, &phone, Some(city.id))
        .expect("record");
    assert!(created);

    let (again, created_again) = store
        .people()
        .record(now + 100, &phone, Some(city.id))
        .expect("record again");
    assert!(!created_again);
    assert_eq!(person.id, again.id);
    assert_eq!(again.created_at, now);

    let fetched = store
        .people()
        .get(person.id)
        .expect("get person")
        .expect("person exists");
    assert_eq!(fetched.phone.as_str(), "9867550819");
    assert_eq!(fetched.city_id, Some(city.id));

    // Same phone in another city is a distinct person row.
    let delhi = store.cities().get_or_create(now, "Delhi").expect("city");
    let (_, created_elsewhere) = store
        .people()
        .record(now, &phone, Some(delhi.id))
        .expect("record elsewhere");
    assert!(created_elsewhere);

    assert_eq!(store.people().count().expect("count"), 2);
    let in_mumbai = store.people().list_by_city(city.id).expect("list");
    assert_eq!(in_mumbai.len(), 1);
    assert_eq!(in_mumbai[0].id, person.id);
}

#[test]
fn record_handles_missing_city() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let now = 1_700_000_000;
    let phone = mobile("9112345678");

    let (_, created) = store.people().record(now, &phone, None).expect("record");
    assert!(created);
    let (_, created_again) = store
        .people()
        .record(now, &phone, None)
        .expect("record again");
    assert!(!created_again);
    assert_eq!(store.people().count().expect("count"), 1);
}

#[test]
fn export_rows_join_people_with_provenance() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let now = 1_700_000_000;
    let city = store.cities().get_or_create(now, "Pune").expect("city");
    let file = store
        .source_files()
        .register(now, "leads.csv")
        .expect("register file");

    let first = mobile("9867550818");
    let second = mobile("9867550819");
    let (person_a, _) = store
        .people()
        .record(now, &first, Some(city.id))
        .expect("record");
    let (person_b, _) = store
        .people()
        .record(now, &second, Some(city.id))
        .expect("record");
    store
        .source_files()
        .link(person_a.id, file.id, 1, "9867550818, Pune")
        .expect("link");
    store
        .source_files()
        .link(person_b.id, file.id, 2, "9867550819, Pune")
        .expect("link");

    let rows = store.people().export_rows(city.id).expect("export rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].phone.as_str(), "9867550818");
    assert_eq!(rows[0].city, "Pune");
    assert_eq!(rows[0].filename.as_deref(), Some("leads.csv"));
    assert_eq!(rows[0].row_number, Some(1));
    assert_eq!(rows[1].phone.as_str(), "9867550819");

    let provenance = store
        .source_files()
        .provenance_for(person_b.id)
        .expect("provenance");
    assert_eq!(provenance.len(), 1);
    assert_eq!(provenance[0].filename, "leads.csv");
    assert_eq!(provenance[0].row_number, 2);
    assert_eq!(provenance[0].raw_text, "9867550819, Pune");
}

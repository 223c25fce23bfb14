//! Tests for `MemoryStore` through the `MatchStore` trait.

use donorlink_core::{
  Error,
  identity::SecretCode,
  lifecycle::Transition,
  member::{MemberId, NewMember, Profile, ProfilePatch, Role},
  registry::Registration,
  roster::Totals,
  store::MatchStore,
};

use crate::MemoryStore;

fn new_member(role: Role, name: &str) -> NewMember {
  NewMember::new(role, Profile {
    name:         name.into(),
    address:      format!("{name}'s street"),
    phone_no:     "555-0100".into(),
    disease_desc: (role == Role::Patient).then(|| "anaemia".to_string()),
  })
}

async fn register(s: &MemoryStore, role: Role, name: &str) -> Registration {
  s.register(new_member(role, name)).await.unwrap()
}

// ─── Registration and lookup ─────────────────────────────────────────────────

#[tokio::test]
async fn register_then_login_and_get() {
  let s = MemoryStore::new();
  let asha = register(&s, Role::Patient, "Asha").await;

  assert_eq!(asha.member.id, MemberId(1));
  assert_eq!(asha.member.disease_desc.as_deref(), Some("anaemia"));

  let by_code = s.login(asha.secret_code.clone()).await.unwrap();
  let by_id = s.get_by_id(MemberId(1)).await.unwrap();
  assert_eq!(by_code, asha.member);
  assert_eq!(by_id, asha.member);
}

#[tokio::test]
async fn register_rejects_blank_name() {
  let s = MemoryStore::new();
  let mut bad = new_member(Role::Donor, "Ravi");
  bad.profile.name = " ".into();

  let err = s.register(bad).await.unwrap_err();
  assert!(matches!(err, Error::Validation { field: "name" }));
  assert_eq!(s.totals().await.unwrap(), Totals::default());
}

#[tokio::test]
async fn login_unknown_code_is_not_found() {
  let s = MemoryStore::new();
  register(&s, Role::Patient, "Asha").await;
  let err = s.login(SecretCode::from("0000")).await.unwrap_err();
  assert!(matches!(err, Error::CodeNotFound));
}

#[tokio::test]
async fn list_all_by_role() {
  let s = MemoryStore::new();
  register(&s, Role::Patient, "Asha").await;
  register(&s, Role::Donor, "Ravi").await;
  register(&s, Role::Donor, "Kiran").await;

  let donors = s.list_all(Role::Donor).await.unwrap();
  assert_eq!(donors.len(), 2);
  assert!(donors.iter().all(|d| d.role == Role::Donor));
  assert_eq!(s.list_all(Role::Patient).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_profile_persists() {
  let s = MemoryStore::new();
  register(&s, Role::Donor, "Ravi").await;

  let updated = s
    .update_profile(MemberId(1), ProfilePatch {
      address:  Some("7 New Rd".into()),
      phone_no: Some(String::new()),
    })
    .await
    .unwrap();
  assert_eq!(updated.address, "7 New Rd");
  assert_eq!(updated.phone_no, "555-0100");
  assert_eq!(s.get_by_id(MemberId(1)).await.unwrap(), updated);
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_member_code_and_edges() {
  let s = MemoryStore::new();
  let asha = register(&s, Role::Patient, "Asha").await;
  register(&s, Role::Donor, "Ravi").await;
  register(&s, Role::Donor, "Kiran").await;

  s.request(MemberId(1), MemberId(2)).await.unwrap();
  s.accept_request(MemberId(2), MemberId(1)).await.unwrap();
  s.request(MemberId(3), MemberId(1)).await.unwrap();

  s.delete_by_id(MemberId(1)).await.unwrap();

  assert!(matches!(
    s.get_by_id(MemberId(1)).await,
    Err(Error::MemberNotFound(MemberId(1)))
  ));
  assert!(matches!(
    s.login(asha.secret_code).await,
    Err(Error::CodeNotFound)
  ));
  assert_eq!(s.totals().await.unwrap(), Totals {
    total:          2,
    total_patients: 0,
    total_donors:   2,
  });

  let ravi = s.get_by_id(MemberId(2)).await.unwrap();
  let kiran = s.get_by_id(MemberId(3)).await.unwrap();
  assert!(ravi.connected().is_empty());
  assert!(kiran.requested().is_empty());

  assert!(matches!(
    s.delete_by_id(MemberId(1)).await,
    Err(Error::MemberNotFound(_))
  ));
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn request_accept_disconnect_scenario() {
  let s = MemoryStore::new();
  register(&s, Role::Patient, "Asha").await;
  register(&s, Role::Donor, "Ravi").await;
  let (asha, ravi) = (MemberId(1), MemberId(2));

  assert_eq!(s.request(asha, ravi).await.unwrap(), Transition::Applied);
  assert_eq!(s.request(asha, ravi).await.unwrap(), Transition::Unchanged);
  let r = s.get_by_id(ravi).await.unwrap();
  assert_eq!(r.pending().as_slice(), &[asha]);

  assert_eq!(
    s.accept_request(ravi, asha).await.unwrap(),
    Transition::Applied
  );
  let a = s.get_by_id(asha).await.unwrap();
  let r = s.get_by_id(ravi).await.unwrap();
  assert!(a.requested().is_empty() && r.pending().is_empty());
  assert_eq!(a.connected().as_slice(), &[ravi]);
  assert_eq!(r.connected().as_slice(), &[asha]);

  s.cancel_connection(asha, ravi).await.unwrap();
  assert!(s.get_by_id(asha).await.unwrap().connected().is_empty());
  assert!(s.get_by_id(ravi).await.unwrap().connected().is_empty());
}

#[tokio::test]
async fn failures_surface_distinct_kinds() {
  let s = MemoryStore::new();
  register(&s, Role::Patient, "Asha").await;
  register(&s, Role::Patient, "Meera").await;
  register(&s, Role::Donor, "Ravi").await;

  assert!(matches!(
    s.request(MemberId(1), MemberId(9)).await,
    Err(Error::MemberNotFound(MemberId(9)))
  ));
  assert!(matches!(
    s.request(MemberId(1), MemberId(2)).await,
    Err(Error::RoleMismatch { .. })
  ));
  assert!(matches!(
    s.accept_request(MemberId(3), MemberId(1)).await,
    Err(Error::InvalidTransition { .. })
  ));
  assert!(matches!(
    s.cancel_request(MemberId(1), MemberId(3)).await,
    Err(Error::InvalidTransition { .. })
  ));
  assert!(matches!(
    s.cancel_connection(MemberId(3), MemberId(1)).await,
    Err(Error::InvalidTransition { .. })
  ));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_requests_create_one_edge() {
  let s = MemoryStore::new();
  register(&s, Role::Patient, "Asha").await;
  register(&s, Role::Donor, "Ravi").await;

  let handles: Vec<_> = (0..64)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.request(MemberId(1), MemberId(2)).await })
    })
    .collect();

  let mut applied = 0;
  for handle in handles {
    if handle.await.unwrap().unwrap() == Transition::Applied {
      applied += 1;
    }
  }
  assert_eq!(applied, 1);

  let asha = s.get_by_id(MemberId(1)).await.unwrap();
  let ravi = s.get_by_id(MemberId(2)).await.unwrap();
  assert_eq!(asha.requested().as_slice(), &[MemberId(2)]);
  assert_eq!(ravi.pending().as_slice(), &[MemberId(1)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposing_operations_stay_symmetric() {
  let s = MemoryStore::new();
  for i in 0..4 {
    register(&s, Role::Patient, &format!("patient {i}")).await;
    register(&s, Role::Donor, &format!("donor {i}")).await;
  }
  // Odd identities are patients, even identities are donors.
  let patients: Vec<MemberId> = (0..4).map(|i| MemberId(2 * i + 1)).collect();
  let donors: Vec<MemberId> = (0..4).map(|i| MemberId(2 * i + 2)).collect();

  let mut handles = Vec::new();
  for round in 0..8 {
    for &p in &patients {
      for &d in &donors {
        let s = s.clone();
        handles.push(tokio::spawn(async move {
          // Results are irrelevant; only the final state is checked.
          let _ = if round % 2 == 0 {
            s.request(p, d).await
          } else {
            s.request(d, p).await
          };
          let _ = s.accept_request(d, p).await;
          let _ = s.accept_request(p, d).await;
          if round % 3 == 0 {
            let _ = s.cancel_connection(p, d).await;
          }
        }));
      }
    }
  }
  for handle in handles {
    handle.await.unwrap();
  }

  let mut all = s.list_all(Role::Patient).await.unwrap();
  all.extend(s.list_all(Role::Donor).await.unwrap());
  for m in &all {
    for other in m.requested().iter() {
      let other = s.get_by_id(other).await.unwrap();
      assert!(other.pending().contains(m.id));
    }
    for other in m.connected().iter() {
      let other = s.get_by_id(other).await.unwrap();
      assert!(other.connected().contains(m.id));
      assert!(!m.requested().contains(other.id));
      assert!(!m.pending().contains(other.id));
    }
  }
}

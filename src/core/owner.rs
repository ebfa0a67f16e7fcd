//! User and group name resolution.
//!
//! Names come from the system account databases through `uzers`, so NSS backed accounts
//! (LDAP, sssd) resolve like they do for `ls`. Every id is looked up once per listing
//! pass; the cache is shared by all collector workers. Ids without a name print numerically.

use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct OwnerNames {
    users: RwLock<HashMap<u32, String>>,
    groups: RwLock<HashMap<u32, String>>,
}

impl OwnerNames {
    pub fn new() -> Self {
        OwnerNames::default()
    }

    pub fn user(&self, uid: u32) -> Option<String> {
        Some(cached(&self.users, uid, lookup_user))
    }

    pub fn group(&self, gid: u32) -> Option<String> {
        Some(cached(&self.groups, gid, lookup_group))
    }
}

fn cached(cache: &RwLock<HashMap<u32, String>>, id: u32, lookup: fn(u32) -> Option<String>) -> String {
    if let Ok(map) = cache.read()
        && let Some(name) = map.get(&id)
    {
        return name.clone();
    }
    let name = lookup(id).unwrap_or_else(|| {
        tracing::debug!("no account name for id {}", id);
        id.to_string()
    });
    if let Ok(mut map) = cache.write() {
        map.insert(id, name.clone());
    }
    name
}

#[cfg(unix)]
fn lookup_user(uid: u32) -> Option<String> {
    uzers::get_user_by_uid(uid).map(|u| u.name().to_string_lossy().into_owned())
}

#[cfg(unix)]
fn lookup_group(gid: u32) -> Option<String> {
    uzers::get_group_by_gid(gid).map(|g| g.name().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn lookup_user(_uid: u32) -> Option<String> {
    None
}

#[cfg(not(unix))]
fn lookup_group(_gid: u32) -> Option<String> {
    None
}

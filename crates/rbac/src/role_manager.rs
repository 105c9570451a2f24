//! RoleManager - Role links derived from grouping rules

use shared::{PolicyError, Result};
use std::collections::{HashMap, HashSet};

/// Default number of role hops followed by `has_link`
pub const DEFAULT_MAX_HIERARCHY_LEVEL: usize = 10;

/// Capability to register and query role links
///
/// The rule store only ever calls `add_link`; the remaining operations serve
/// whoever evaluates role membership.
pub trait RoleManager {
    /// Register `user` as a member of `role`, optionally scoped to a domain
    fn add_link(&mut self, user: &str, role: &str, domain: &[&str]);

    /// Remove a previously registered link
    fn delete_link(&mut self, user: &str, role: &str, domain: &[&str]) -> Result<()>;

    /// Whether `user` inherits `role`, directly or transitively
    fn has_link(&self, user: &str, role: &str, domain: &[&str]) -> bool;

    /// Direct roles of `user`
    fn get_roles(&self, user: &str, domain: &[&str]) -> Vec<String>;

    /// Direct members of `role`
    fn get_users(&self, role: &str, domain: &[&str]) -> Vec<String>;

    /// Drop every link
    fn clear(&mut self);
}

/// Links within a single domain
#[derive(Debug, Default)]
struct RoleGraph {
    /// member -> roles, in registration order
    roles: HashMap<String, Vec<String>>,
    /// role -> members, in registration order
    members: HashMap<String, Vec<String>>,
}

impl RoleGraph {
    fn link(&mut self, user: &str, role: &str) -> bool {
        let roles = self.roles.entry(user.to_string()).or_default();
        if roles.iter().any(|r| r == role) {
            return false;
        }
        roles.push(role.to_string());

        self.members
            .entry(role.to_string())
            .or_default()
            .push(user.to_string());
        true
    }

    fn unlink(&mut self, user: &str, role: &str) -> bool {
        let removed = match self.roles.get_mut(user) {
            Some(roles) => match roles.iter().position(|r| r == role) {
                Some(index) => {
                    roles.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };

        if removed {
            if let Some(members) = self.members.get_mut(role) {
                members.retain(|m| m != user);
            }
        }
        removed
    }

    /// Breadth-first walk up the hierarchy, at most `max_level` hops
    fn reaches(&self, user: &str, role: &str, max_level: usize) -> bool {
        if user == role {
            return true;
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(user);
        let mut frontier = vec![user];

        for _ in 0..max_level {
            let mut next = Vec::new();
            for name in frontier {
                let Some(parents) = self.roles.get(name) else {
                    continue;
                };
                for parent in parents {
                    if parent == role {
                        return true;
                    }
                    if seen.insert(parent.as_str()) {
                        next.push(parent.as_str());
                    }
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        false
    }

    fn edge_count(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }
}

/// In-memory role hierarchy, keyed by domain
///
/// Registering the same link twice keeps a single edge, so rebuilding links
/// from a rule store that already fed this manager is harmless.
#[derive(Debug)]
pub struct DefaultRoleManager {
    /// Domain fields -> links (empty for links without a domain)
    domains: HashMap<Vec<String>, RoleGraph>,
    max_hierarchy_level: usize,
}

impl DefaultRoleManager {
    /// Create a new DefaultRoleManager
    pub fn new() -> Self {
        Self::with_max_hierarchy_level(DEFAULT_MAX_HIERARCHY_LEVEL)
    }

    /// Create a manager that follows at most `level` role hops
    pub fn with_max_hierarchy_level(level: usize) -> Self {
        Self {
            domains: HashMap::new(),
            max_hierarchy_level: level,
        }
    }

    pub fn max_hierarchy_level(&self) -> usize {
        self.max_hierarchy_level
    }

    /// Total number of edges across all domains
    pub fn link_count(&self) -> usize {
        self.domains.values().map(RoleGraph::edge_count).sum()
    }

    fn domain_key(domain: &[&str]) -> Vec<String> {
        domain.iter().map(|field| field.to_string()).collect()
    }

    fn graph(&self, domain: &[&str]) -> Option<&RoleGraph> {
        self.domains.get(&Self::domain_key(domain))
    }
}

impl RoleManager for DefaultRoleManager {
    fn add_link(&mut self, user: &str, role: &str, domain: &[&str]) {
        let added = self
            .domains
            .entry(Self::domain_key(domain))
            .or_default()
            .link(user, role);

        if added {
            tracing::trace!(user, role, domain = ?domain, "role link added");
        }
    }

    fn delete_link(&mut self, user: &str, role: &str, domain: &[&str]) -> Result<()> {
        let removed = self
            .domains
            .get_mut(&Self::domain_key(domain))
            .map(|graph| graph.unlink(user, role))
            .unwrap_or(false);

        if !removed {
            return Err(PolicyError::LinkNotFound {
                user: user.to_string(),
                role: role.to_string(),
            });
        }
        Ok(())
    }

    fn has_link(&self, user: &str, role: &str, domain: &[&str]) -> bool {
        if user == role {
            return true;
        }

        self.graph(domain)
            .map(|graph| graph.reaches(user, role, self.max_hierarchy_level))
            .unwrap_or(false)
    }

    fn get_roles(&self, user: &str, domain: &[&str]) -> Vec<String> {
        self.graph(domain)
            .and_then(|graph| graph.roles.get(user))
            .cloned()
            .unwrap_or_default()
    }

    fn get_users(&self, role: &str, domain: &[&str]) -> Vec<String> {
        self.graph(domain)
            .and_then(|graph| graph.members.get(role))
            .cloned()
            .unwrap_or_default()
    }

    fn clear(&mut self) {
        self.domains.clear();
    }
}

impl Default for DefaultRoleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============== Basic Link Tests ==============

    #[test]
    fn test_add_and_query_link() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "admin", &[]);

        assert!(manager.has_link("alice", "admin", &[]));
        assert!(!manager.has_link("admin", "alice", &[]));
        assert_eq!(manager.get_roles("alice", &[]), vec!["admin".to_string()]);
        assert_eq!(manager.get_users("admin", &[]), vec!["alice".to_string()]);
    }

    #[test]
    fn test_self_link_always_holds() {
        let manager = DefaultRoleManager::new();
        assert!(manager.has_link("nobody", "nobody", &[]));
    }

    #[test]
    fn test_unknown_user_has_no_roles() {
        let manager = DefaultRoleManager::new();
        assert!(manager.get_roles("ghost", &[]).is_empty());
        assert!(manager.get_users("ghost", &[]).is_empty());
        assert!(!manager.has_link("ghost", "admin", &[]));
    }

    #[test]
    fn test_roles_keep_registration_order() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "writer", &[]);
        manager.add_link("alice", "reader", &[]);
        manager.add_link("alice", "auditor", &[]);

        assert_eq!(
            manager.get_roles("alice", &[]),
            vec!["writer".to_string(), "reader".to_string(), "auditor".to_string()]
        );
    }

    // ============== Hierarchy Tests ==============

    #[test]
    fn test_transitive_link() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "editor", &[]);
        manager.add_link("editor", "viewer", &[]);

        assert!(manager.has_link("alice", "viewer", &[]));
        // get_roles only lists direct roles
        assert_eq!(manager.get_roles("alice", &[]), vec!["editor".to_string()]);
    }

    #[test]
    fn test_hierarchy_depth_limit() {
        let mut manager = DefaultRoleManager::with_max_hierarchy_level(2);
        manager.add_link("u", "r1", &[]);
        manager.add_link("r1", "r2", &[]);
        manager.add_link("r2", "r3", &[]);

        assert!(manager.has_link("u", "r1", &[]));
        assert!(manager.has_link("u", "r2", &[]));
        assert!(!manager.has_link("u", "r3", &[]));
    }

    #[test]
    fn test_circular_links_terminate() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("a", "b", &[]);
        manager.add_link("b", "c", &[]);
        manager.add_link("c", "a", &[]);

        assert!(manager.has_link("a", "c", &[]));
        assert!(!manager.has_link("a", "d", &[]));
    }

    // ============== Domain Tests ==============

    #[test]
    fn test_domain_scoping() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "admin", &["tenant1"]);
        manager.add_link("bob", "admin", &["tenant2"]);

        assert!(manager.has_link("alice", "admin", &["tenant1"]));
        assert!(!manager.has_link("alice", "admin", &["tenant2"]));
        assert!(!manager.has_link("alice", "admin", &[]));
        assert_eq!(manager.get_users("admin", &["tenant2"]), vec!["bob".to_string()]);
    }

    #[test]
    fn test_domain_fields_are_not_joined() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "admin", &["a::b"]);
        manager.add_link("bob", "admin", &["a", "b"]);

        assert!(manager.has_link("alice", "admin", &["a::b"]));
        assert!(!manager.has_link("alice", "admin", &["a", "b"]));
        assert_eq!(manager.get_users("admin", &["a", "b"]), vec!["bob".to_string()]);
        assert_eq!(manager.get_users("admin", &["a::b"]), vec!["alice".to_string()]);
    }

    // ============== Mutation Tests ==============

    #[test]
    fn test_duplicate_link_collapses() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "admin", &[]);
        manager.add_link("alice", "admin", &[]);

        assert_eq!(manager.link_count(), 1);
        assert_eq!(manager.get_users("admin", &[]), vec!["alice".to_string()]);
    }

    #[test]
    fn test_delete_link() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "admin", &[]);
        manager.add_link("bob", "admin", &[]);

        assert!(manager.delete_link("alice", "admin", &[]).is_ok());
        assert!(!manager.has_link("alice", "admin", &[]));
        assert_eq!(manager.get_users("admin", &[]), vec!["bob".to_string()]);

        let err = manager.delete_link("alice", "admin", &[]).unwrap_err();
        assert!(matches!(err, PolicyError::LinkNotFound { .. }));
    }

    #[test]
    fn test_clear() {
        let mut manager = DefaultRoleManager::new();
        manager.add_link("alice", "admin", &[]);
        manager.add_link("bob", "admin", &["tenant1"]);
        manager.clear();

        assert_eq!(manager.link_count(), 0);
        assert!(!manager.has_link("alice", "admin", &[]));
    }

    #[test]
    fn test_default_level() {
        let manager = DefaultRoleManager::default();
        assert_eq!(manager.max_hierarchy_level(), DEFAULT_MAX_HIERARCHY_LEVEL);
    }
}

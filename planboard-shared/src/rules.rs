//! Cross-entity validation rules
//!
//! These checks run inside the project and task creation workflows, after
//! the relevant rows have been loaded and before anything is written:
//!
//! - a team lead must exist and hold a role that may lead projects
//! - every requested member email must resolve to a user
//! - a task assignee must exist and be a member of the target project
//!
//! The functions are pure so the outcomes can be checked without a database.
//! Each [`RuleError`] is classified as either not-found or a rule violation.

use crate::models::user::User;

/// Outcome of a failed business rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// No user has the team lead email
    #[error("Team lead with email {0} not found")]
    TeamLeadNotFound(String),

    /// The team lead's role may not lead projects
    #[error("User with email {0} does not have permission to be a team lead")]
    IneligibleTeamLead(String),

    /// Some member emails did not resolve
    #[error("Members with emails [{}] not found", .0.join(", "))]
    MembersNotFound(Vec<String>),

    /// No project has the requested name
    #[error("Project with name \"{0}\" not found")]
    ProjectNotFound(String),

    /// No user has the assignee email
    #[error("User with email {0} not found")]
    AssigneeNotFound(String),

    /// The assignee is not linked to the project
    #[error("User with email {email} is not a member of the project \"{project}\"")]
    NotProjectMember { email: String, project: String },
}

impl RuleError {
    /// Whether the error reports a missing entity rather than a violated rule
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RuleError::TeamLeadNotFound(_)
                | RuleError::MembersNotFound(_)
                | RuleError::ProjectNotFound(_)
                | RuleError::AssigneeNotFound(_)
        )
    }
}

/// Resolves the team lead lookup and checks role eligibility
///
/// # Errors
///
/// - [`RuleError::TeamLeadNotFound`] if `team_lead` is `None`
/// - [`RuleError::IneligibleTeamLead`] if the role is not `project_manager`
///   or `team_lead`
pub fn require_team_lead(email: &str, team_lead: Option<User>) -> Result<User, RuleError> {
    let user = team_lead.ok_or_else(|| RuleError::TeamLeadNotFound(email.to_string()))?;

    if !user.role.can_lead_projects() {
        return Err(RuleError::IneligibleTeamLead(email.to_string()));
    }

    Ok(user)
}

/// Drops repeated emails, keeping the first occurrence of each
pub fn dedup_emails(emails: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(emails.len());
    for email in emails {
        if !unique.contains(email) {
            unique.push(email.clone());
        }
    }
    unique
}

/// Returns the requested emails that no user in `found` carries, in request order
pub fn missing_emails(requested: &[String], found: &[User]) -> Vec<String> {
    requested
        .iter()
        .filter(|email| !found.iter().any(|user| &user.email == *email))
        .cloned()
        .collect()
}

/// Checks that every requested member email resolved to a user
///
/// `requested` is expected to be free of duplicates (see [`dedup_emails`]).
///
/// # Errors
///
/// [`RuleError::MembersNotFound`] listing exactly the unresolved emails.
pub fn require_all_members(requested: &[String], found: Vec<User>) -> Result<Vec<User>, RuleError> {
    if found.len() != requested.len() {
        let missing = missing_emails(requested, &found);
        if !missing.is_empty() {
            return Err(RuleError::MembersNotFound(missing));
        }
    }

    Ok(found)
}

/// Checks that `assignee` appears in the project's member list
///
/// # Errors
///
/// [`RuleError::NotProjectMember`] if no member has the assignee's ID.
pub fn require_project_member(
    project_name: &str,
    members: &[User],
    assignee: &User,
) -> Result<(), RuleError> {
    if members.iter().any(|member| member.id == assignee.id) {
        return Ok(());
    }

    Err(RuleError::NotProjectMember {
        email: assignee.email.clone(),
        project: project_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::Utc;

    fn user(id: i64, email: &str, role: UserRole) -> User {
        User {
            id,
            name: format!("User {}", id),
            email: email.to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn emails(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_team_lead_missing_is_not_found() {
        let err = require_team_lead("ghost@example.com", None).unwrap_err();
        assert_eq!(err, RuleError::TeamLeadNotFound("ghost@example.com".to_string()));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Team lead with email ghost@example.com not found");
    }

    #[test]
    fn test_member_role_cannot_lead() {
        let candidate = user(1, "m@example.com", UserRole::Member);
        let err = require_team_lead("m@example.com", Some(candidate)).unwrap_err();
        assert_eq!(err, RuleError::IneligibleTeamLead("m@example.com".to_string()));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_admin_role_cannot_lead() {
        let candidate = user(1, "a@example.com", UserRole::Admin);
        assert!(matches!(
            require_team_lead("a@example.com", Some(candidate)),
            Err(RuleError::IneligibleTeamLead(_))
        ));
    }

    #[test]
    fn test_managers_and_team_leads_can_lead() {
        for role in [UserRole::ProjectManager, UserRole::TeamLead] {
            let candidate = user(1, "lead@example.com", role);
            let lead = require_team_lead("lead@example.com", Some(candidate)).unwrap();
            assert_eq!(lead.role, role);
        }
    }

    #[test]
    fn test_missing_emails_in_request_order() {
        let requested = emails(&["c@x.io", "a@x.io", "b@x.io", "d@x.io"]);
        let found = vec![user(1, "a@x.io", UserRole::Member), user(2, "d@x.io", UserRole::Member)];

        assert_eq!(missing_emails(&requested, &found), emails(&["c@x.io", "b@x.io"]));
    }

    #[test]
    fn test_require_all_members_lists_exactly_the_missing() {
        let requested = emails(&["a@x.io", "b@x.io", "c@x.io"]);
        let found = vec![user(1, "b@x.io", UserRole::Member)];

        let err = require_all_members(&requested, found).unwrap_err();
        assert_eq!(err, RuleError::MembersNotFound(emails(&["a@x.io", "c@x.io"])));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Members with emails [a@x.io, c@x.io] not found");
    }

    #[test]
    fn test_require_all_members_accepts_complete_resolution() {
        let requested = emails(&["a@x.io", "b@x.io"]);
        let found = vec![user(1, "a@x.io", UserRole::Member), user(2, "b@x.io", UserRole::TeamLead)];

        let members = require_all_members(&requested, found).unwrap();
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_require_all_members_accepts_empty_request() {
        assert!(require_all_members(&[], Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_dedup_emails_keeps_first_occurrence() {
        let requested = emails(&["b@x.io", "a@x.io", "b@x.io", "a@x.io", "c@x.io"]);
        assert_eq!(dedup_emails(&requested), emails(&["b@x.io", "a@x.io", "c@x.io"]));
    }

    #[test]
    fn test_duplicate_request_resolves_after_dedup() {
        let requested = dedup_emails(&emails(&["a@x.io", "a@x.io"]));
        let found = vec![user(1, "a@x.io", UserRole::Member)];

        assert_eq!(require_all_members(&requested, found).unwrap().len(), 1);
    }

    #[test]
    fn test_assignee_must_be_member() {
        let members = vec![user(1, "a@x.io", UserRole::Member), user(2, "b@x.io", UserRole::Member)];
        let outsider = user(3, "c@x.io", UserRole::Member);

        let err = require_project_member("Apollo", &members, &outsider).unwrap_err();
        assert_eq!(
            err,
            RuleError::NotProjectMember {
                email: "c@x.io".to_string(),
                project: "Apollo".to_string(),
            }
        );
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "User with email c@x.io is not a member of the project \"Apollo\""
        );
    }

    #[test]
    fn test_membership_matches_by_id() {
        let members = vec![user(1, "a@x.io", UserRole::Member), user(2, "b@x.io", UserRole::Member)];
        let assignee = user(2, "b@x.io", UserRole::Member);

        assert!(require_project_member("Apollo", &members, &assignee).is_ok());
    }

    #[test]
    fn test_project_and_assignee_not_found_messages() {
        let err = RuleError::ProjectNotFound("Apollo".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Project with name \"Apollo\" not found");

        let err = RuleError::AssigneeNotFound("x@x.io".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User with email x@x.io not found");
    }
}

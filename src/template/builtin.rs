use crate::imports::*;

use super::Template;

/*
    The stock report definitions. Format specifiers are "<width><kind>"
    where the kind is one of: s = string, e = epoch date, g = gigabytes.
*/
pub(super) fn all() -> [Result<Template>; 5] {
    [users(), spaces(), shares(), members(), connections()]
}

fn users() -> Result<Template> {
    Template::builder("users")
        .labelled_field("user_name", "$.userName", "25s", "User")
        .labelled_field("user_email", "$.EMAIL", "35s", "Email")
        .labelled_field("user_lastLogin", "$.LAST_LOGIN_DATE", "10e", "Last Login")
        .labelled_field("user_days_visited", "$.NUMBER_OF_DAYS_VISITED", "10s", "Days Visited")
        .labelled_field("role_name", "$.roleName", "30s", "Role")
        .row("{user_name} {user_email} {user_lastLogin} {user_days_visited}")
        .iterative_row("$.roles_list", "  Role: {role_name}")
        .build()
}

fn spaces() -> Result<Template> {
    Template::builder("spaces")
        .field("space_name", "$.name", "30s")
        .field("space_memory_assigned", "$.resources.memory.assigned", "10g")
        .field("space_memory_used", "$.resources.memory.used", "10g")
        .field("enabledDataLake", "$.enableDataLake", "10s")
        .aggregate_field("space_members", "$.members[*]", "30s", "$.name")
        .aggregate_field("space_dbusers", "$.dbusers.*", "30s", "$.key")
        .field("member_name", "$.name", "30s")
        .row("{space_name} {space_memory_assigned} {space_memory_used} {enabledDataLake} {space_dbusers}")
        .iterative_row("$.members", "  Member(s): {member_name}")
        .build()
}

fn shares() -> Result<Template> {
    Template::builder("shares")
        .field("space_name", "$.spaceName", "30s")
        .field("object_name", "$.objectName", "30s")
        .field("target_space", "$.targetSpace", "30s")
        .row("{space_name} {object_name} {target_space}")
        .build()
}

fn members() -> Result<Template> {
    Template::builder("members")
        .field("space_name", "$.space_name", "30s")
        .field("user_name", "$.name", "30s")
        .field("user_type", "$.type", "10s")
        .field("user_email", "$.email", "30s")
        .row("{space_name} {user_name} {user_email} {user_type}")
        .build()
}

fn connections() -> Result<Template> {
    Template::builder("connections")
        .field("space_name", "$.space_name", "30s")
        .field("business_name", "$.businessName", "30s")
        .field("type_id", "$.typeId", "20s")
        .field("mod_date", "$.modification_date", "35s")
        .row("{space_name} {business_name} {type_id} {mod_date}")
        .build()
}

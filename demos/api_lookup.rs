//! Membership checks and list helpers over a decoded API response.
//!
//! Run with: cargo run --example api_lookup

use pve_conf::{
    add_to_list, csv_to_array, extract_token_id, item_in_key_of_array, values_to_csv, ApiValue,
};
use std::error::Error;

const USERS: &str = r#"[
    {"userid": "root@pam", "groups": ["admins"]},
    {"userid": "alice@pve", "groups": ["admins", "ops"], "tokens": [{"tokenid": "ci"}]}
]"#;

fn main() -> Result<(), Box<dyn Error>> {
    let users: ApiValue = serde_json::from_str(USERS)?;
    let users = users.as_array().ok_or("expected a user list")?;

    for id in ["root@pam", "alice@pve!ci", "alice@pve!deploy", "bob@pve"] {
        let found = item_in_key_of_array(users, "userid", id)?;
        match extract_token_id(id) {
            Some(token) => println!("{:<18} token {:<8} found: {}", id, token, found),
            None => println!("{:<18} {:<14} found: {}", id, "user", found),
        }
    }

    let groups = users[1]
        .get("groups")
        .and_then(ApiValue::as_array)
        .ok_or("alice has no groups")?;
    let groups = add_to_list(&values_to_csv(groups)?, "dev");
    println!("\ngroups parameter: {}", groups);
    println!("split again: {:?}", csv_to_array(&groups));

    Ok(())
}

use pve_conf::{
    add_to_list, array_to_csv, csv_to_array, disk_size_gib, disk_size_gib_value, from_conf_str,
    item_in_key_of_array, parse_conf, parse_pm_conf, to_conf_string, values_to_csv, ApiValue,
    ConfOptions, Error, Scalar,
};
use serde::{Deserialize, Serialize};

const QEMU_CONFIG: &str = r#"{
    "name": "web01",
    "cores": 4,
    "memory": "8192",
    "scsi0": "local-lvm:vm-101-disk-0,cache=writeback,discard=on,iothread=1,size=64G",
    "scsi1": "ceph-pool:vm-101-disk-1,size=500GB,ssd=1",
    "ide2": "none,media=cdrom",
    "net0": "virtio=BC:24:11:2E:2B:6A,bridge=vmbr0,firewall=1,tag=20",
    "hostpci0": "0000:01:00.0,pcie=1,x-vga=1"
}"#;

const USERS: &str = r#"[
    {"userid": "root@pam", "enable": 1},
    {"userid": "alice@pve", "enable": 1, "tokens": [{"tokenid": "deploy"}, {"tokenid": "ci"}]},
    {"userid": "bob@ldap", "enable": 0, "tokens": null}
]"#;

fn config() -> ApiValue {
    serde_json::from_str(QEMU_CONFIG).unwrap()
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Net {
    model: String,
    #[serde(rename = "virtio")]
    mac: Option<String>,
    bridge: String,
    firewall: bool,
    tag: Option<u16>,
}

#[test]
fn test_decode_disks_from_api_config() {
    let config = config();
    let scsi0 = parse_pm_conf(config.get("scsi0").and_then(|v| v.as_str()).unwrap(), "volume");

    assert_eq!(scsi0.get_str("volume"), Some("local-lvm:vm-101-disk-0"));
    assert_eq!(scsi0.get_str("cache"), Some("writeback"));
    assert_eq!(scsi0.get_str("discard"), Some("on"));
    assert_eq!(scsi0.get("iothread"), Some(&Scalar::Integer(1)));
    assert_eq!(disk_size_gib(scsi0.get_str("size").unwrap()).unwrap(), 64.0);
}

#[test]
fn test_total_disk_size_mixes_units() {
    let config = config();
    let total: f64 = ["scsi0", "scsi1"]
        .iter()
        .filter_map(|key| config.get(key).and_then(|v| v.as_str()))
        .map(|conf| parse_pm_conf(conf, "volume"))
        .map(|disk| disk_size_gib(disk.get_str("size").unwrap()).unwrap())
        .sum();

    let expected = 64.0 + 500.0 * 1e9 / 1_073_741_824.0;
    assert!((total - expected).abs() < 1e-9);
}

#[test]
fn test_cdrom_implicit_value() {
    let config = config();
    let ide2 = parse_pm_conf(config.get("ide2").and_then(|v| v.as_str()).unwrap(), "file");
    assert_eq!(ide2.get_str("file"), Some("none"));
    assert_eq!(ide2.get_str("media"), Some("cdrom"));
}

#[test]
fn test_net_first_token_is_keyed() {
    // net strings start with model=mac, so the implicit key does not apply
    let config = config();
    let net0 = parse_pm_conf(config.get("net0").and_then(|v| v.as_str()).unwrap(), "model");
    assert!(!net0.contains_key("model"));
    assert_eq!(net0.get_str("virtio"), Some("BC:24:11:2E:2B:6A"));
    assert_eq!(net0.get_i64("tag"), Some(20));
    assert_eq!(net0.get_bool("firewall"), Some(true));
}

#[test]
fn test_typed_net_roundtrip() {
    let options = ConfOptions::pve().with_implicit_first_key("model");
    let net: Net = from_conf_str("virtio,bridge=vmbr1,firewall=0,tag=30", &options).unwrap();
    assert_eq!(
        net,
        Net {
            model: "virtio".to_string(),
            mac: None,
            bridge: "vmbr1".to_string(),
            firewall: false,
            tag: Some(30),
        }
    );
    assert_eq!(
        to_conf_string(&net, &options).unwrap(),
        "virtio,bridge=vmbr1,firewall=0,tag=30"
    );
}

#[test]
fn test_sizes_from_api_values() {
    let config = config();
    assert!(matches!(
        disk_size_gib_value(config.get("memory").unwrap()),
        Ok(size) if size == 8192.0
    ));
    assert_eq!(disk_size_gib_value(config.get("cores").unwrap()).unwrap(), 4.0);
    assert!(matches!(
        disk_size_gib_value(config.get("missing").unwrap_or(&ApiValue::Null)),
        Err(Error::Type { .. })
    ));
}

#[test]
fn test_user_and_token_membership() {
    let users: ApiValue = serde_json::from_str(USERS).unwrap();
    let users = users.as_array().unwrap();

    assert!(item_in_key_of_array(users, "userid", "root@pam").unwrap());
    assert!(item_in_key_of_array(users, "userid", "alice@pve!ci").unwrap());
    assert!(item_in_key_of_array(users, "userid", "alice@pve!deploy").unwrap());
    assert!(!item_in_key_of_array(users, "userid", "alice@pve!ops").unwrap());
    assert!(!item_in_key_of_array(users, "userid", "carol@pve").unwrap());
}

#[test]
fn test_token_id_matches_any_users_tokens() {
    // the user part of the id is not checked against the owning record
    let users: ApiValue = serde_json::from_str(USERS).unwrap();
    let users = users.as_array().unwrap();
    assert!(item_in_key_of_array(users, "userid", "bob@ldap!ci").unwrap());
}

#[test]
fn test_group_members_list() {
    let members: ApiValue = serde_json::from_str(r#"["alice@pve","bob@ldap"]"#).unwrap();
    let csv = values_to_csv(members.as_array().unwrap()).unwrap();
    assert_eq!(csv, "alice@pve,bob@ldap");

    let extended = add_to_list(&csv, "carol@pve");
    assert_eq!(csv_to_array(&extended).len(), 3);
    assert_eq!(array_to_csv(csv_to_array(&extended)), extended);
}

#[test]
fn test_mixed_list_is_type_error() {
    let members: ApiValue = serde_json::from_str(r#"["alice@pve", 7]"#).unwrap();
    assert_eq!(
        values_to_csv(members.as_array().unwrap()).unwrap_err(),
        Error::type_mismatch("string", "number")
    );
}

#[test]
fn test_custom_dialect_record() {
    let options = ConfOptions::new()
        .with_separator(";")
        .with_sub_separator(":")
        .with_implicit_first_key("id");
    let record = parse_conf("mp0;mp:/srv/data;backup:false;size:8G", &options);
    assert_eq!(record.get_str("id"), Some("mp0"));
    assert_eq!(record.get_str("mp"), Some("/srv/data"));
    assert_eq!(record.get_bool("backup"), Some(false));
    assert_eq!(
        record.to_conf_string(&options).unwrap(),
        "mp0;mp:/srv/data;backup:0;size:8G"
    );
}

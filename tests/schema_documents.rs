use std::fs;

use pretty_assertions::assert_eq;
use schema_tables::decode::decode;
use schema_tables::lower::{load_schema, parse_schema};
use schema_tables::path_de::read_json_file;
use schema_tables::{HtmlTable, LoadError, RenderOptions, SchemaError};

const SCHEMA: &str = r#"{
    "type": "array",
    "item": {
        "type": "complex",
        "name": "Person",
        "base": {"type": "complex", "name": "Entity", "fields": {"id": "integer"}},
        "fields": {
            "name": "string",
            "home": "anyURI",
            "address": {
                "type": "complex", "name": "Address", "layout": "row",
                "fields": {"city": "string", "zip": "string"}
            }
        }
    }
}"#;

const PEOPLE: &str = r#"[
    {"name": "Ada", "id": 1, "home": {"href": "http://ada.example/", "text": "ada"},
     "address": {"zip": "34000", "city": "Istanbul"}},
    {"id": 2, "name": "Bo", "home": null}
]"#;

#[test]
fn files_on_disk_render_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("people.schema.json");
    let data_path = dir.path().join("people.json");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(&data_path, PEOPLE).unwrap();

    let schema = load_schema(&schema_path).unwrap();
    let json: serde_json::Value = read_json_file(&data_path).unwrap();
    let value = decode(&json, &schema).unwrap();

    let options = RenderOptions::default().without_field_type_name_attr();
    let html = HtmlTable::column(options).render_to_string(&schema, &value, "people").unwrap();
    assert_eq!(
        html,
        "<table class=\"Person\">\
           <thead><tr>\
             <th class=\"id\">id</th><th class=\"name\">name</th>\
             <th class=\"home\">home</th><th class=\"address\">address</th>\
           </tr></thead>\
           <tbody>\
             <tr>\
               <td class=\"id\">1</td><td class=\"name\">Ada</td>\
               <td class=\"home\"><a href=\"http://ada.example/\">ada</a></td>\
               <td class=\"address\"><table class=\"Address\"><tbody>\
                 <tr><th class=\"city\">city</th><td class=\"city\">Istanbul</td></tr>\
                 <tr><th class=\"zip\">zip</th><td class=\"zip\">34000</td></tr>\
               </tbody></table></td>\
             </tr>\
             <tr>\
               <td class=\"id\">2</td><td class=\"name\">Bo</td>\
               <td class=\"home\"></td><td class=\"address\"></td>\
             </tr>\
           </tbody>\
         </table>"
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_schema(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
}

#[test]
fn empty_type_name_is_rejected() {
    let err = parse_schema(r#"{"type": "complex", "name": "", "fields": {}}"#).unwrap_err();
    assert!(matches!(err, LoadError::Schema(SchemaError::EmptyTypeName)), "{err}");
}

#[test]
fn malformed_options_name_the_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    fs::write(&path, r#"{"header": "yes"}"#).unwrap();
    let err = read_json_file::<RenderOptions>(&path).unwrap_err();
    assert!(err.to_string().starts_with("at JSON path header"), "{err}");
}

// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use nv_odata_csdl::edmx::Edmx;
use nv_odata_csdl::semantics::AnnotationTarget;
use nv_odata_csdl::semantics::EdmErrorCode;
use nv_odata_csdl::semantics::Model;
use nv_odata_csdl::semantics::Resolution;
use nv_odata_core::type_ref::TypeKind;
use nv_odata_core::value::EnumValue;
use nv_odata_core::ParseOutcome;
use nv_odata_core::PrimitiveKind;
use nv_odata_core::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

fn read(name: &str) -> Edmx {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name);
    Edmx::parse(&fs::read_to_string(path).unwrap()).unwrap()
}

fn sales() -> Model {
    Model::new(vec![read("core.xml"), read("sales.xml")])
}

fn schema(body: &str) -> Model {
    let xml = format!(
        r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
          <edmx:DataServices>
            <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Test">{body}</Schema>
          </edmx:DataServices>
        </edmx:Edmx>"#
    );
    Model::new(vec![Edmx::parse(&xml).unwrap()])
}

#[test]
fn test_sales_model_is_valid() {
    let model = sales();
    assert_eq!(model.errors(), Vec::new());
}

#[test]
fn test_missing_vocabulary_is_reported() {
    let model = Model::new(vec![read("sales.xml")]);
    let errors = model.errors();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.code == EdmErrorCode::BadUnresolvedTerm));
}

#[test]
fn test_inherited_key_and_properties() {
    let model = sales();
    let customer = model.find_type("S.Customer").unwrap();
    let entity = model.find_type("Sales.Entity").unwrap();
    assert_eq!(model.base_types(customer), vec![entity]);
    let id = model.find_property(customer, "Id").unwrap();
    assert_eq!(model.property_owner(id), entity);
    assert_eq!(*model.key(customer), vec![Resolution::Resolved(id)]);
    let names = model
        .all_properties(customer)
        .iter()
        .map(|p| model.property_name(*p))
        .collect::<Vec<_>>();
    assert_eq!(names, ["Id", "Name", "Level", "Address", "Tags", "Orders"]);
}

#[test]
fn test_enum_member_values() {
    let model = sales();
    let level = model.find_type("Sales.Level").unwrap();
    let values = model
        .enum_members(level)
        .iter()
        .map(|m| (m.name.clone(), m.value.resolved().copied(), m.is_explicit))
        .collect::<Vec<_>>();
    assert_eq!(
        values,
        [
            ("Bronze".to_string(), Some(0), false),
            ("Silver".to_string(), Some(1), false),
            ("Gold".to_string(), Some(10), true),
            ("Platinum".to_string(), Some(11), false),
        ]
    );
    let permissions = model.find_type("Sales.Permissions").unwrap();
    assert_eq!(*model.enum_underlying_type(permissions), Resolution::Resolved(PrimitiveKind::Byte));
    assert!(model.is_flags(permissions));
}

#[test]
fn test_enum_member_overflow() {
    let model = schema(
        r#"<EnumType Name="Small" UnderlyingType="Edm.SByte">
             <Member Name="Top" Value="127"/>
             <Member Name="Next"/>
           </EnumType>"#,
    );
    let small = model.find_type("Test.Small").unwrap();
    let members = model.enum_members(small);
    assert_eq!(members[0].value, Resolution::Resolved(127));
    assert_eq!(members[1].value.errors().len(), 1);
    assert_eq!(members[1].value.errors()[0].code, EdmErrorCode::EnumMemberValueOutOfRange);
    assert_eq!(model.errors().len(), 1);
}

#[test]
fn test_memoized_results_are_shared() {
    let model = sales();
    let customer = model.find_type("Sales.Customer").unwrap();
    let orders = model.find_property(customer, "Orders").unwrap();
    let first = model.property_type(orders);
    assert!(Arc::ptr_eq(&first, &model.property_type(orders)));
    let results = thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(|| model.all_properties(customer)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    assert!(Arc::ptr_eq(&results[0], &model.all_properties(customer)));
}

#[test]
fn test_unresolved_property_reference_has_one_error() {
    let model = schema(
        r#"<EntityType Name="Item">
             <Key><PropertyRef Name="Code"/></Key>
             <Property Name="Id" Type="Edm.Int32"/>
           </EntityType>"#,
    );
    let item = model.find_type("Test.Item").unwrap();
    let key = model.key(item);
    assert_eq!(key.len(), 1);
    let errors = key[0].errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, EdmErrorCode::BadUnresolvedProperty);
    assert_eq!(model.errors(), errors);
}

#[test]
fn test_cycles_are_reported() {
    let model = schema(
        r#"<ComplexType Name="A" BaseType="Test.B"/>
           <ComplexType Name="B" BaseType="Test.A"/>
           <ComplexType Name="C" BaseType="Test.A"/>
           <Term Name="T" Type="Edm.String"/>
           <Annotations Target="Test.C">
             <Annotation Term="Test.T">
               <LabeledElement Name="Loop">
                 <LabeledElementReference>Test.Loop</LabeledElementReference>
               </LabeledElement>
             </Annotation>
           </Annotations>"#,
    );
    let errors = model.errors();
    let cyclic_types = errors.iter().filter(|e| e.code == EdmErrorCode::BadCyclicType).count();
    let cyclic_labels = errors
        .iter()
        .filter(|e| e.code == EdmErrorCode::BadCyclicLabeledElement)
        .count();
    assert_eq!(cyclic_types, 2);
    assert_eq!(cyclic_labels, 1);
    let c = model.find_type("Test.C").unwrap();
    let a = model.find_type("Test.A").unwrap();
    // Deriving from a cyclic chain is not a cycle itself.
    assert_eq!(*model.base_type(c), Some(Resolution::Resolved(a)));
}

#[test]
fn test_navigation_and_containers() {
    let model = sales();
    let customer = model.find_type("Sales.Customer").unwrap();
    let order = model.find_type("Sales.Order").unwrap();
    let orders = model.find_property(customer, "Orders").unwrap();
    let back = model.find_property(order, "Customer").unwrap();
    assert_eq!(*model.partner(orders), Some(Resolution::Resolved(back)));
    let type_ref = model.property_type(orders);
    let type_ref = type_ref.resolved().unwrap();
    assert_eq!(type_ref.kind(), TypeKind::Collection);
    assert_eq!(type_ref.full_name(), "Collection(Sales.Order)");

    let container = model.find_entity_container("S.Default").unwrap();
    let customers = model.find_entity_set(container, "Customers").unwrap();
    let order_set = model.find_entity_set(container, "Orders").unwrap();
    let bindings = model.navigation_bindings(customers);
    assert_eq!(bindings[0].property, Resolution::Resolved(orders));
    assert_eq!(bindings[0].target, Resolution::Resolved(order_set));
    let me = model.find_singleton(container, "Me").unwrap();
    assert_eq!(*model.source_entity_type(me), Resolution::Resolved(customer));
}

#[test]
fn test_annotations() {
    let model = sales();
    let customer = model.find_type("Sales.Customer").unwrap();
    let name = model.find_property(customer, "Name").unwrap();
    assert_eq!(
        model.description(AnnotationTarget::Type(customer)).as_deref(),
        Some("Customer of the shop")
    );
    assert_eq!(model.description(AnnotationTarget::Property(name)).as_deref(), Some("Full name"));
    let container = model.find_entity_container("Sales.Default").unwrap();
    let customers = model.find_entity_set(container, "Customers").unwrap();
    assert_eq!(
        model.description(AnnotationTarget::Source(customers)).as_deref(),
        Some("All customers")
    );
    let priority = model
        .find_annotation(AnnotationTarget::Type(customer), "Sales.Priority", None)
        .unwrap();
    assert_eq!(model.evaluate_annotation(priority), Resolution::Resolved(Value::from(2_i64)));
}

#[test]
fn test_enum_literals_from_model() {
    let model = sales();
    let level = model.parse_type_reference("Sales.Level").resolved().cloned().unwrap();
    let ParseOutcome::Value(Value::Enum(value)) = model.literal_parsers().parse("Sales.Level'Gold'", &level)
    else {
        panic!("enum value expected");
    };
    assert_eq!(
        value,
        EnumValue {
            type_name: "Sales.Level".into(),
            value: 10,
            member_names: vec!["Gold".into()],
        }
    );
    assert_eq!(
        model.literal_parsers().parse("Sales.Level'Diamond'", &level),
        ParseOutcome::NotApplicable
    );
}

//! Fixture documents and grammars

/// Legacy list view with no id and no name/model fields
pub const MINIMAL_TREE_VIEW: &str = r#"<odoo>
    <record model="ir.ui.view">
        <field name="arch" type="xml">
            <tree/>
        </field>
    </record>
</odoo>
"#;

pub const COMMON_RNG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rng:grammar xmlns:rng="http://relaxng.org/ns/structure/1.0"
             datatypeLibrary="http://www.w3.org/2001/XMLSchema-datatypes">
    <rng:define name="overload">
        <rng:optional>
            <rng:attribute name="position">
                <rng:choice>
                    <rng:value>after</rng:value>
                    <rng:value>before</rng:value>
                    <rng:value>inside</rng:value>
                    <rng:value>replace</rng:value>
                </rng:choice>
            </rng:attribute>
        </rng:optional>
    </rng:define>
    <rng:define name="field">
        <rng:element name="field">
            <rng:attribute name="name"/>
            <rng:ref name="overload"/>
            <rng:optional><rng:attribute name="string"/></rng:optional>
            <rng:optional><rng:attribute name="invisible"/></rng:optional>
            <rng:empty/>
        </rng:element>
    </rng:define>
    <rng:define name="button">
        <rng:element name="button">
            <rng:optional><rng:attribute name="name"/></rng:optional>
            <rng:optional><rng:attribute name="string"/></rng:optional>
            <rng:optional><rng:attribute name="type"/></rng:optional>
            <rng:empty/>
        </rng:element>
    </rng:define>
</rng:grammar>
"#;

pub const LIST_RNG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rng:grammar xmlns:rng="http://relaxng.org/ns/structure/1.0"
             datatypeLibrary="http://www.w3.org/2001/XMLSchema-datatypes">
    <rng:include href="common.rng"/>
    <rng:define name="list">
        <rng:element name="list">
            <rng:optional><rng:attribute name="string"/></rng:optional>
            <rng:optional><rng:attribute name="editable"/></rng:optional>
            <rng:zeroOrMore>
                <rng:choice>
                    <rng:ref name="field"/>
                    <rng:ref name="button"/>
                </rng:choice>
            </rng:zeroOrMore>
        </rng:element>
    </rng:define>
    <rng:start>
        <rng:ref name="list"/>
    </rng:start>
</rng:grammar>
"#;

/// Inherited view of `base.view_partner_form` with one xpath already in place
pub const PARTNER_FORM_EXTENSION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<odoo>
    <record id="view_partner_form_custom" model="ir.ui.view">
        <field name="name">res.partner.form.custom</field>
        <field name="model">res.partner</field>
        <field name="inherit_id" ref="base.view_partner_form"/>
        <field name="arch" type="xml">
            <xpath expr="//field[@name='name']" position="after">
                <field name="x_existing"/>
            </xpath>
        </field>
    </record>
</odoo>
"#;

/// Complete list view record with the given arch body
pub fn list_view(id: &str, body: &str) -> String {
    format!(
        r#"<odoo>
    <record id="{id}" model="ir.ui.view">
        <field name="name">{id}</field>
        <field name="model">res.partner</field>
        <field name="arch" type="xml">
            {body}
        </field>
    </record>
</odoo>
"#
    )
}

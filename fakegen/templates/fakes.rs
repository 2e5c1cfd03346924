// Generated by fakegen from `{{ source }}`. Do not edit.

::fakegen::fake! {
{%- if !history_len.is_empty() %}
    {{ history_len }}
{%- endif %}
{%- for fake in fakes %}

    {{ fake.attribute }}
    {{ fake.signature }};
{%- endfor %}
}
